/// The opcodes this interpreter executes.
pub mod opcode {
    pub const BIPUSH: u8 = 0x10;
    pub const LDC: u8 = 0x12;
    pub const ILOAD_0: u8 = 0x1a;
    pub const ILOAD_1: u8 = 0x1b;
    pub const ILOAD_2: u8 = 0x1c;
    pub const ILOAD_3: u8 = 0x1d;
    pub const ISTORE_0: u8 = 0x3b;
    pub const ISTORE_1: u8 = 0x3c;
    pub const ISTORE_2: u8 = 0x3d;
    pub const ISTORE_3: u8 = 0x3e;
    pub const IADD: u8 = 0x60;
    pub const IRETURN: u8 = 0xac;
    pub const RETURN: u8 = 0xb1;
    pub const GETSTATIC: u8 = 0xb2;
    pub const INVOKEVIRTUAL: u8 = 0xb6;
    pub const INVOKESTATIC: u8 = 0xb8;
}

/// The mnemonic of a supported opcode, for logging.
pub fn mnemonic(op: u8) -> &'static str {
    match op {
        opcode::BIPUSH => "bipush",
        opcode::LDC => "ldc",
        opcode::ILOAD_0 => "iload_0",
        opcode::ILOAD_1 => "iload_1",
        opcode::ILOAD_2 => "iload_2",
        opcode::ILOAD_3 => "iload_3",
        opcode::ISTORE_0 => "istore_0",
        opcode::ISTORE_1 => "istore_1",
        opcode::ISTORE_2 => "istore_2",
        opcode::ISTORE_3 => "istore_3",
        opcode::IADD => "iadd",
        opcode::IRETURN => "ireturn",
        opcode::RETURN => "return",
        opcode::GETSTATIC => "getstatic",
        opcode::INVOKEVIRTUAL => "invokevirtual",
        opcode::INVOKESTATIC => "invokestatic",
        _ => "<unknown>",
    }
}
