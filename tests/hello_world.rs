mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{ClassBuilder, SharedBuffer};
use rust_jvm::vm::{self, NativeBridge, NativeMethod, Value};
use rust_jvm::{parse_class_file, run_class_bytes, Error};

/// Builds `HelloWorld` with a `main` whose code comes from `main`, given the pool indices of
/// `System.out`, the greeting and `println(String)`.
fn hello_world_with<F>(main: F) -> Vec<u8>
    where F: FnOnce([u8; 2], u8, [u8; 2]) -> Vec<u8>
{
    let mut class = ClassBuilder::new("HelloWorld");
    let out = class.field_ref("java/lang/System", "out", "Ljava/io/PrintStream;");
    let greeting = class.string("Hello, World!");
    let println = class.method_ref("java/io/PrintStream", "println", "(Ljava/lang/String;)V");
    let code = main(out.to_be_bytes(), greeting as u8, println.to_be_bytes());
    class.method("main", "([Ljava/lang/String;)V", 2, 1, &code);
    class.build()
}

fn hello_world() -> Vec<u8> {
    hello_world_with(|[out_hi, out_lo], greeting, [println_hi, println_lo]| vec![
        0xb2, out_hi, out_lo,
        0x12, greeting,
        0xb6, println_hi, println_lo,
        0xb1,
    ])
}

/// A bridge whose `println` records its arguments instead of printing them.
fn recording_bridge() -> (NativeBridge, Rc<RefCell<Vec<Vec<Value>>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut natives = NativeBridge::new();
    natives.register_static_field("java/lang/System", "out", Value::int(0));
    let recorded = calls.clone();
    natives.register_method("java/io/PrintStream", "println", NativeMethod::new(move |_, args| {
        recorded.borrow_mut().push(args.to_vec());
        Ok(None)
    }));
    (natives, calls)
}

#[test]
fn test_hello_world() {
    let (natives, calls) = recording_bridge();
    let class = parse_class_file(&hello_world()).unwrap();
    assert_eq!(vm::run_main(&class, &natives).unwrap(), None);
    assert_eq!(*calls.borrow(), vec![vec![Value::String(Rc::from("Hello, World!"))]]);
}

#[test]
fn test_hello_world_standard_library() {
    let buffer = SharedBuffer::default();
    let natives = NativeBridge::with_standard_library(buffer.clone());
    run_class_bytes(&hello_world(), &natives).unwrap();
    assert_eq!(buffer.contents(), "Hello, World!\n");
}

#[test]
fn test_missing_binding() {
    let natives = NativeBridge::new();
    match run_class_bytes(&hello_world(), &natives) {
        Err(Error::NativeBindingNotFound { ref class, ref member }) => {
            assert_eq!(class, "java/lang/System");
            assert_eq!(member, "out");
        }
        other => panic!("expected NativeBindingNotFound, got {:?}", other),
    }
}

#[test]
fn test_receiver_must_be_pushed_before_the_argument() {
    // ldc, getstatic, invokevirtual: the receiver sits above the string
    let bytes = hello_world_with(|[out_hi, out_lo], greeting, [println_hi, println_lo]| vec![
        0x12, greeting,
        0xb2, out_hi, out_lo,
        0xb6, println_hi, println_lo,
        0xb1,
    ]);
    let (natives, calls) = recording_bridge();
    match run_class_bytes(&bytes, &natives) {
        Err(Error::OperandTypeMismatch { pc: 5, expected: "reference", ref found }) =>
            assert_eq!(found, "static field"),
        other => panic!("expected OperandTypeMismatch, got {:?}", other),
    }
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_receiver_must_come_from_getstatic() {
    let bytes = hello_world_with(|_, greeting, [println_hi, println_lo]| vec![
        0x10, 1,
        0x12, greeting,
        0xb6, println_hi, println_lo,
        0xb1,
    ]);
    let (natives, calls) = recording_bridge();
    match run_class_bytes(&bytes, &natives) {
        Err(Error::OperandTypeMismatch { pc: 4, expected: "static field", ref found }) =>
            assert_eq!(found, "int"),
        other => panic!("expected OperandTypeMismatch, got {:?}", other),
    }
    assert!(calls.borrow().is_empty());
}
