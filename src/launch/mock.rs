//! Recording stand-in for a real VM

use super::{VmError, VmOptions, VmProvider, VmSession};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Create(Vec<String>),
    FindClass(String),
    StaticMethod(String, String),
    NewArray(usize),
    SetElement(usize, String),
    Invoke,
    TakeException(Option<String>),
    Destroy,
}

/// Which step should fail
#[derive(Debug, Clone, Default)]
pub(crate) struct Faults {
    pub create: bool,
    pub class: bool,
    pub method: bool,
    pub array: bool,
    pub element: Option<usize>,
    pub throw: bool,
    /// Fail without raising an exception
    pub backend: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockVm {
    calls: Rc<RefCell<Vec<Call>>>,
    faults: Faults,
}

impl MockVm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn created(&self) -> bool {
        self.calls().iter().any(|c| matches!(c, Call::Create(_)))
    }

    pub fn options(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .find_map(|c| match c {
                Call::Create(options) => Some(options),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn count(&self, want: &Call) -> usize {
        self.calls().iter().filter(|c| *c == want).count()
    }
}

impl VmProvider for MockVm {
    type Session = MockSession;

    fn create(&self, options: &VmOptions<'_>) -> Result<MockSession, VmError> {
        self.calls
            .borrow_mut()
            .push(Call::Create(options.iter().map(String::from).collect()));

        if self.faults.create {
            return Err(VmError::Backend("JNI_CreateJavaVM returned -1".to_string()));
        }

        Ok(MockSession {
            calls: Rc::clone(&self.calls),
            faults: self.faults.clone(),
            pending: None,
        })
    }
}

pub(crate) struct MockSession {
    calls: Rc<RefCell<Vec<Call>>>,
    faults: Faults,
    pending: Option<String>,
}

impl MockSession {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn raise(&mut self, exception: impl Into<String>) -> VmError {
        if self.faults.backend {
            return VmError::Backend("backend failure".to_string());
        }
        self.pending = Some(exception.into());
        VmError::ExceptionPending
    }
}

impl VmSession for MockSession {
    type Class = String;
    type Method = &'static str;
    type StringArray = usize;

    fn find_class(&mut self, name: &str) -> Result<String, VmError> {
        self.record(Call::FindClass(name.to_string()));
        if self.faults.class {
            return Err(self.raise(format!("java.lang.NoClassDefFoundError: {}", name)));
        }
        Ok(name.to_string())
    }

    fn static_method(
        &mut self,
        _class: &String,
        name: &str,
        signature: &str,
    ) -> Result<&'static str, VmError> {
        self.record(Call::StaticMethod(name.to_string(), signature.to_string()));
        if self.faults.method {
            return Err(self.raise(format!("java.lang.NoSuchMethodError: {}", name)));
        }
        Ok("main")
    }

    fn new_string_array(&mut self, len: usize) -> Result<usize, VmError> {
        self.record(Call::NewArray(len));
        if self.faults.array {
            return Err(self.raise("java.lang.OutOfMemoryError"));
        }
        Ok(len)
    }

    fn set_string_element(&mut self, _array: &usize, index: usize, value: &str) -> Result<(), VmError> {
        self.record(Call::SetElement(index, value.to_string()));
        if self.faults.element == Some(index) {
            return Err(self.raise("java.lang.OutOfMemoryError"));
        }
        Ok(())
    }

    fn call_static_void(&mut self, _class: &String, _method: &&'static str, _args: &usize) -> Result<(), VmError> {
        self.record(Call::Invoke);
        if self.faults.throw {
            return Err(self.raise("java.lang.IllegalStateException: boom"));
        }
        Ok(())
    }

    fn take_exception(&mut self) -> Option<String> {
        let pending = self.pending.take();
        self.record(Call::TakeException(pending.clone()));
        pending
    }

    fn destroy(&mut self) {
        self.record(Call::Destroy);
    }
}
