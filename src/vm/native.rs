//! The bridge from symbolic class and member names to behavior implemented by the host.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use crate::error::{Error, Result};
use crate::vm::value::{NativeObject, Value};

type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Option<Value>>;

/// A host callable standing in for a method. It receives the receiver and the already resolved
/// arguments, and may produce a value for the caller's operand stack.
pub struct NativeMethod(Box<NativeFn>);

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native method>")
    }
}

impl NativeMethod {
    pub fn new<F>(method: F) -> Self
        where F: Fn(&Value, &[Value]) -> Result<Option<Value>> + 'static
    {
        NativeMethod(Box::new(method))
    }

    pub fn invoke(&self, receiver: &Value, args: &[Value]) -> Result<Option<Value>> {
        (self.0)(receiver, args)
    }
}

/// Registries of native methods and static field values, keyed by binary class name and member
/// name. Populated before execution starts and only read afterwards.
#[derive(Debug, Default)]
pub struct NativeBridge {
    methods: HashMap<(String, String), NativeMethod>,
    static_fields: HashMap<(String, String), Value>,
}

impl NativeBridge {
    /// A bridge with no bindings at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bridge with `java/lang/System.out` bound to a print stream over `out`, and the
    /// `java/io/PrintStream` methods that write to it.
    pub fn with_standard_library<W: Write + 'static>(out: W) -> Self {
        let mut bridge = Self::new();
        bridge.register_static_field("java/lang/System", "out",
                                     Value::Native(NativeObject::new(PrintStream::new(out))));
        bridge.register_method("java/io/PrintStream", "println", NativeMethod::new(PRINTLN));
        bridge.register_method("java/io/PrintStream", "print", NativeMethod::new(PRINT));
        bridge
    }

    /// The standard library bindings over the process's standard output.
    pub fn with_stdout() -> Self {
        Self::with_standard_library(io::stdout())
    }

    pub fn register_method(&mut self, class: &str, name: &str, method: NativeMethod) {
        self.methods.insert((class.to_owned(), name.to_owned()), method);
    }

    pub fn register_static_field(&mut self, class: &str, name: &str, value: Value) {
        self.static_fields.insert((class.to_owned(), name.to_owned()), value);
    }

    pub fn method(&self, class: &str, name: &str) -> Result<&NativeMethod> {
        self.methods.get(&(class.to_owned(), name.to_owned()))
            .ok_or_else(|| not_found(class, name))
    }

    pub fn static_field(&self, class: &str, name: &str) -> Result<&Value> {
        self.static_fields.get(&(class.to_owned(), name.to_owned()))
            .ok_or_else(|| not_found(class, name))
    }
}

fn not_found(class: &str, member: &str) -> Error {
    Error::NativeBindingNotFound { class: class.to_owned(), member: member.to_owned() }
}

/// The host side of a `java.io.PrintStream`.
pub struct PrintStream {
    out: RefCell<Box<dyn Write>>,
}

impl PrintStream {
    pub fn new<W: Write + 'static>(out: W) -> Self {
        PrintStream { out: RefCell::new(Box::new(out)) }
    }

    fn write(&self, args: &[Value], newline: bool) -> Result<Option<Value>> {
        let mut out = self.out.borrow_mut();
        for arg in args {
            write!(out, "{}", arg)?;
        }
        if newline {
            writeln!(out)?;
        }
        out.flush()?;
        Ok(None)
    }
}

fn print_stream(receiver: &Value) -> Result<&PrintStream> {
    let stream = match *receiver {
        Value::Native(ref object) => object.downcast_ref::<PrintStream>(),
        _ => None,
    };
    stream.ok_or_else(|| not_found("java/io/PrintStream", "<receiver>"))
}

const PRINTLN: fn(&Value, &[Value]) -> Result<Option<Value>> =
    |receiver, args| print_stream(receiver)?.write(args, true);

const PRINT: fn(&Value, &[Value]) -> Result<Option<Value>> =
    |receiver, args| print_stream(receiver)?.write(args, false);

#[cfg(test)]
mod test {
    use super::*;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn lookup_miss_is_an_error() {
        let bridge = NativeBridge::new();
        match bridge.method("java/io/PrintStream", "println") {
            Err(Error::NativeBindingNotFound { ref class, ref member }) => {
                assert_eq!(class, "java/io/PrintStream");
                assert_eq!(member, "println");
            }
            other => panic!("expected NativeBindingNotFound, got {:?}", other),
        }
        assert!(bridge.static_field("java/lang/System", "out").is_err());
    }

    #[test]
    fn standard_print_stream_writes_strings_and_ints() {
        let buffer = SharedBuffer::default();
        let bridge = NativeBridge::with_standard_library(buffer.clone());
        let out = bridge.static_field("java/lang/System", "out").unwrap().clone();
        let println = bridge.method("java/io/PrintStream", "println").unwrap();
        let print = bridge.method("java/io/PrintStream", "print").unwrap();

        print.invoke(&out, &[Value::String(Rc::from("sum = "))]).unwrap();
        assert_eq!(println.invoke(&out, &[Value::int(7)]).unwrap(), None);
        println.invoke(&out, &[]).unwrap();
        assert_eq!(&*buffer.0.borrow(), b"sum = 7\n\n");

        assert!(println.invoke(&Value::int(1), &[]).is_err());
    }
}
