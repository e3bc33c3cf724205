//! Invocation handles bound to discovered methods.
//!
//! The scanner never calls through a handle; it only carries one inside each
//! [`Descriptor`](crate::Descriptor) so that a dispatcher can reach the
//! underlying method later without knowing how it was declared.

use std::any::{Any, type_name};
use std::fmt;

use crate::error::InvokeError;

/// Output of a successful invocation: the method's return value, boxed.
pub type InvokeResult = Result<Box<dyn Any>, InvokeError>;

/// Signature of a generated invoker function.
pub type InvokeFn = fn(CallTarget<'_>, Vec<Box<dyn Any>>) -> InvokeResult;

/// The receiver an invocation runs against.
pub enum CallTarget<'a> {
    /// No receiver; used for associated (static) functions.
    Static,
    /// A shared borrow of the instance, for `&self` methods.
    Shared(&'a dyn Any),
    /// An exclusive borrow of the instance, for `&self` or `&mut self` methods.
    Exclusive(&'a mut dyn Any),
}

impl<'a> CallTarget<'a> {
    /// Resolves the receiver as a shared reference to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::MissingReceiver`] for [`CallTarget::Static`] and
    /// [`InvokeError::ReceiverType`] when the receiver is not a `T`.
    pub fn shared<T: 'static>(self) -> Result<&'a T, InvokeError> {
        let receiver: &'a dyn Any = match self {
            CallTarget::Static => return Err(InvokeError::MissingReceiver),
            CallTarget::Shared(receiver) => receiver,
            CallTarget::Exclusive(receiver) => receiver,
        };
        receiver
            .downcast_ref::<T>()
            .ok_or(InvokeError::ReceiverType {
                expected: type_name::<T>(),
                access: "shared",
            })
    }

    /// Resolves the receiver as an exclusive reference to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::MissingReceiver`] for [`CallTarget::Static`] and
    /// [`InvokeError::ReceiverType`] when the receiver is shared or is not a
    /// `T`.
    pub fn exclusive<T: 'static>(self) -> Result<&'a mut T, InvokeError> {
        let mismatch = InvokeError::ReceiverType {
            expected: type_name::<T>(),
            access: "exclusive",
        };
        match self {
            CallTarget::Static => Err(InvokeError::MissingReceiver),
            CallTarget::Shared(_) => Err(mismatch),
            CallTarget::Exclusive(receiver) => receiver.downcast_mut::<T>().ok_or(mismatch),
        }
    }
}

impl fmt::Debug for CallTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTarget::Static => f.write_str("Static"),
            CallTarget::Shared(_) => f.write_str("Shared(..)"),
            CallTarget::Exclusive(_) => f.write_str("Exclusive(..)"),
        }
    }
}

/// Positional arguments for an invocation, consumed in declaration order.
pub struct Arguments {
    values: std::vec::IntoIter<Box<dyn Any>>,
    position: usize,
}

impl Arguments {
    /// Wraps the supplied values after checking their count.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Arity`] when `values.len() != expected`.
    pub fn new(values: Vec<Box<dyn Any>>, expected: usize) -> Result<Self, InvokeError> {
        if values.len() != expected {
            return Err(InvokeError::Arity {
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            values: values.into_iter(),
            position: 0,
        })
    }

    /// Takes the next argument as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::ArgumentType`] when the value is missing or is
    /// not a `T`.
    pub fn take<T: 'static>(&mut self, name: &'static str) -> Result<T, InvokeError> {
        let index = self.position;
        self.position += 1;
        let mismatch = InvokeError::ArgumentType {
            index,
            name,
            expected: type_name::<T>(),
        };
        let value = self.values.next().ok_or_else(|| mismatch.clone())?;
        value.downcast::<T>().map(|value| *value).map_err(|_| mismatch)
    }
}

/// Opaque capability for calling a discovered method.
#[derive(Clone, Copy)]
pub struct InvocationHandle {
    invoke: InvokeFn,
}

impl InvocationHandle {
    /// Binds a handle to an invoker function.
    #[must_use]
    pub const fn new(invoke: InvokeFn) -> Self {
        Self { invoke }
    }

    /// Calls the bound method.
    ///
    /// # Errors
    ///
    /// Propagates any [`InvokeError`] raised while resolving the receiver or
    /// the arguments.
    pub fn invoke(&self, target: CallTarget<'_>, args: Vec<Box<dyn Any>>) -> InvokeResult {
        (self.invoke)(target, args)
    }
}

impl fmt::Debug for InvocationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InvocationHandle(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i64,
    }

    fn add(target: CallTarget<'_>, args: Vec<Box<dyn Any>>) -> InvokeResult {
        let mut args = Arguments::new(args, 1)?;
        let this = target.exclusive::<Counter>()?;
        this.value += args.take::<i64>("amount")?;
        Ok(Box::new(this.value))
    }

    fn peek(target: CallTarget<'_>, args: Vec<Box<dyn Any>>) -> InvokeResult {
        Arguments::new(args, 0)?;
        let this = target.shared::<Counter>()?;
        Ok(Box::new(this.value))
    }

    #[test]
    fn exclusive_invocation_mutates_receiver() {
        let handle = InvocationHandle::new(add);
        let mut counter = Counter { value: 40 };

        let output = handle
            .invoke(CallTarget::Exclusive(&mut counter), vec![Box::new(2_i64) as Box<dyn Any>])
            .unwrap();

        assert_eq!(*output.downcast::<i64>().unwrap(), 42);
        assert_eq!(counter.value, 42);
    }

    #[test]
    fn shared_methods_accept_exclusive_receivers() {
        let handle = InvocationHandle::new(peek);
        let mut counter = Counter { value: 7 };

        let output = handle
            .invoke(CallTarget::Exclusive(&mut counter), Vec::new())
            .unwrap();
        assert_eq!(*output.downcast::<i64>().unwrap(), 7);
    }

    #[test]
    fn exclusive_methods_reject_shared_receivers() {
        let handle = InvocationHandle::new(add);
        let counter = Counter { value: 0 };

        let err = handle
            .invoke(CallTarget::Shared(&counter), vec![Box::new(1_i64) as Box<dyn Any>])
            .expect_err("shared receiver should be rejected");
        assert!(matches!(err, InvokeError::ReceiverType { access: "exclusive", .. }));
    }

    #[test]
    fn missing_receiver_errors() {
        let err = InvocationHandle::new(peek)
            .invoke(CallTarget::Static, Vec::new())
            .expect_err("static target should be rejected");
        assert_eq!(err, InvokeError::MissingReceiver);
    }

    #[test]
    fn wrong_receiver_type_errors() {
        let other = String::from("not a counter");
        let err = InvocationHandle::new(peek)
            .invoke(CallTarget::Shared(&other), Vec::new())
            .expect_err("foreign receiver should be rejected");
        assert!(matches!(err, InvokeError::ReceiverType { access: "shared", .. }));
    }

    #[test]
    fn arity_and_argument_types_are_checked() {
        let handle = InvocationHandle::new(add);
        let mut counter = Counter { value: 0 };

        let err = handle
            .invoke(CallTarget::Exclusive(&mut counter), Vec::new())
            .expect_err("missing argument should error");
        assert_eq!(err, InvokeError::Arity { expected: 1, found: 0 });

        let err = handle
            .invoke(CallTarget::Exclusive(&mut counter), vec![Box::new("two") as Box<dyn Any>])
            .expect_err("wrong argument type should error");
        assert!(matches!(
            err,
            InvokeError::ArgumentType { index: 0, name: "amount", .. }
        ));
        assert_eq!(counter.value, 0);
    }
}
