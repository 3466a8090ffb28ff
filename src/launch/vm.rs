use super::VmOptions;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// The VM raised an exception; fetch it with [`VmSession::take_exception`]
    #[error("Java exception pending")]
    ExceptionPending,

    #[error("{0}")]
    Backend(String),
}

/// Something that can start a virtual machine
pub trait VmProvider {
    type Session: VmSession;

    /// Create a VM from the assembled startup options
    fn create(&self, options: &VmOptions<'_>) -> Result<Self::Session, VmError>;
}

/// The slice of the VM embedding API a launch needs
///
/// Every fallible call reports a raised exception as
/// [`VmError::ExceptionPending`] and leaves it pending until
/// [`take_exception`](VmSession::take_exception) clears it.
pub trait VmSession {
    type Class;
    type Method;
    type StringArray;

    /// Look up a class by its binary name (`com/example/Main`)
    fn find_class(&mut self, name: &str) -> Result<Self::Class, VmError>;

    /// Resolve a static method by name and JNI signature
    fn static_method(
        &mut self,
        class: &Self::Class,
        name: &str,
        signature: &str,
    ) -> Result<Self::Method, VmError>;

    /// Allocate a `String[]` of `len` null elements
    fn new_string_array(&mut self, len: usize) -> Result<Self::StringArray, VmError>;

    fn set_string_element(
        &mut self,
        array: &Self::StringArray,
        index: usize,
        value: &str,
    ) -> Result<(), VmError>;

    /// Call a `static void` method taking a single `String[]`
    fn call_static_void(
        &mut self,
        class: &Self::Class,
        method: &Self::Method,
        args: &Self::StringArray,
    ) -> Result<(), VmError>;

    /// Check for a pending exception; if there is one, describe it, clear it
    /// and return its description
    fn take_exception(&mut self) -> Option<String>;

    /// Tear the VM down. Called exactly once per session.
    fn destroy(&mut self);
}
