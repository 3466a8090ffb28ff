//! [`VmProvider`] over the JNI invocation API

use crate::launch::{VmError, VmOptions, VmProvider, VmSession};
use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JClass, JObject, JObjectArray, JStaticMethodID, JString, JThrowable, JValue};
use jni::signature::{Primitive, ReturnType};
use jni::sys::jsize;
use jni::{InitArgsBuilder, JNIEnv, JNIVersion, JavaVM};
use log::{debug, warn};

fn vm_error(err: JniError) -> VmError {
    match err {
        JniError::JavaException => VmError::ExceptionPending,
        other => VmError::Backend(other.to_string()),
    }
}

fn to_jsize(value: usize) -> Result<jsize, VmError> {
    jsize::try_from(value).map_err(|_| VmError::Backend(format!("{} does not fit in jsize", value)))
}

/// Starts VMs through `JNI_CreateJavaVM`
#[derive(Debug, Default, Clone, Copy)]
pub struct JniProvider;

impl VmProvider for JniProvider {
    type Session = JniSession;

    fn create(&self, options: &VmOptions<'_>) -> Result<JniSession, VmError> {
        let mut builder = InitArgsBuilder::new()
            .version(JNIVersion::from(options.version()))
            .ignore_unrecognized(options.ignore_unrecognized());
        for option in options.iter() {
            builder = builder.option(option);
        }

        let args = builder
            .build()
            .map_err(|e| VmError::Backend(e.to_string()))?;
        let vm = JavaVM::new(args).map_err(|e| VmError::Backend(e.to_string()))?;

        // The creating thread stays attached until the VM is destroyed
        vm.attach_current_thread_permanently().map_err(vm_error)?;
        debug!("virtual machine created with {} options", options.len());

        Ok(JniSession { vm })
    }
}

/// One live VM with the launching thread attached
///
/// Handles are kept as global references so they outlive the JNI call that
/// produced them; the orchestrator drops them before [`destroy`](VmSession::destroy).
pub struct JniSession {
    vm: JavaVM,
}

impl JniSession {
    fn env(&self) -> Result<JNIEnv<'_>, VmError> {
        self.vm.get_env().map_err(vm_error)
    }
}

fn describe(env: &mut JNIEnv, throwable: &JThrowable) -> Option<String> {
    let text = env
        .call_method(throwable, "toString", "()Ljava/lang/String;", &[])
        .ok()?
        .l()
        .ok()?;
    let text = JString::from(text);
    let description: String = env.get_string(&text).ok()?.into();
    Some(description)
}

impl VmSession for JniSession {
    type Class = GlobalRef;
    type Method = JStaticMethodID;
    type StringArray = GlobalRef;

    fn find_class(&mut self, name: &str) -> Result<GlobalRef, VmError> {
        let mut env = self.env()?;
        let class = env.find_class(name).map_err(vm_error)?;
        let global = env.new_global_ref(&class).map_err(vm_error)?;
        let _ = env.delete_local_ref(class);
        Ok(global)
    }

    fn static_method(
        &mut self,
        class: &GlobalRef,
        name: &str,
        signature: &str,
    ) -> Result<JStaticMethodID, VmError> {
        let mut env = self.env()?;
        let class: &JClass = class.as_obj().into();
        env.get_static_method_id(class, name, signature)
            .map_err(vm_error)
    }

    fn new_string_array(&mut self, len: usize) -> Result<GlobalRef, VmError> {
        let mut env = self.env()?;
        let array = env
            .new_object_array(to_jsize(len)?, "java/lang/String", JObject::null())
            .map_err(vm_error)?;
        let global = env.new_global_ref(&array).map_err(vm_error)?;
        let _ = env.delete_local_ref(array);
        Ok(global)
    }

    fn set_string_element(
        &mut self,
        array: &GlobalRef,
        index: usize,
        value: &str,
    ) -> Result<(), VmError> {
        let mut env = self.env()?;
        let array: &JObjectArray = array.as_obj().into();
        let value = env.new_string(value).map_err(vm_error)?;
        env.set_object_array_element(array, to_jsize(index)?, &value)
            .map_err(vm_error)?;
        let _ = env.delete_local_ref(value);
        Ok(())
    }

    fn call_static_void(
        &mut self,
        class: &GlobalRef,
        method: &JStaticMethodID,
        args: &GlobalRef,
    ) -> Result<(), VmError> {
        let mut env = self.env()?;
        let class: &JClass = class.as_obj().into();
        let args = [JValue::Object(args.as_obj()).as_jni()];

        // Safety: `method` was resolved on `class` with MAIN_SIGNATURE, which
        // takes exactly one String[] and returns void.
        unsafe {
            env.call_static_method_unchecked(
                class,
                *method,
                ReturnType::Primitive(Primitive::Void),
                &args,
            )
        }
        .map(|_| ())
        .map_err(vm_error)
    }

    fn take_exception(&mut self) -> Option<String> {
        let mut env = self.env().ok()?;
        if !env.exception_check().unwrap_or(false) {
            return None;
        }

        let throwable = env.exception_occurred().ok();
        let _ = env.exception_describe();
        let _ = env.exception_clear();

        let description = throwable.and_then(|t| describe(&mut env, &t));
        // toString itself may have thrown
        let _ = env.exception_clear();

        Some(description.unwrap_or_else(|| "unknown exception".to_string()))
    }

    fn destroy(&mut self) {
        // Safety: the orchestrator has dropped every handle from this session
        // and no other thread was attached by it.
        if let Err(e) = unsafe { self.vm.destroy() } {
            warn!("DestroyJavaVM failed: {}", e);
        }
    }
}
