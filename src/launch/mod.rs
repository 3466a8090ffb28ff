mod config;
mod error;
mod options;
mod vm;

#[cfg(test)]
pub(crate) mod mock;

pub use config::{DEFAULT_CLASS_PATH, LaunchConfig, ResolvedLaunch};
pub use error::{ConfigError, LaunchError};
pub use options::{CLASS_PATH_PROPERTY, JNI_VERSION_1_2, VmOptions};
pub use vm::{VmError, VmProvider, VmSession};

use log::{debug, error, info, warn};
use std::ops::{Deref, DerefMut};

/// Name of the entry point method
pub const MAIN_METHOD: &str = "main";

/// JNI signature of `void main(String[])`
pub const MAIN_SIGNATURE: &str = "([Ljava/lang/String;)V";

/// Exit code for a launch that returned normally
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for every failure
pub const EXIT_FAILURE: i32 = -1;

/// Owns a live session and destroys it when dropped
struct SessionGuard<S: VmSession> {
    session: S,
}

impl<S: VmSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: VmSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: VmSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        debug!("destroying virtual machine");
        self.session.destroy();
    }
}

/// Convert `com.example.Main` to the VM's binary form `com/example/Main`
pub fn binary_class_name(class: &str) -> String {
    class.replace('.', "/")
}

/// Launch the guest program described by `config` and wait for it
///
/// Each VM step runs only if the previous one succeeded. Whatever happens
/// after creation, a pending exception is described and cleared, and the VM
/// is destroyed before returning.
pub fn launch<P: VmProvider>(provider: &P, config: &LaunchConfig) -> Result<(), LaunchError> {
    let resolved = config.resolve()?;
    let options = VmOptions::new(&resolved.class_path, &config.vm_options);

    info!(
        "launching {} (class path {})",
        resolved.main_class, resolved.class_path
    );
    debug!("vm options: {:?}", options.iter().collect::<Vec<_>>());

    let session = provider.create(&options).map_err(LaunchError::CreateVm)?;
    let mut session = SessionGuard { session };

    let outcome = invoke_main(&mut *session, &resolved.main_class, &config.args);

    match session.take_exception() {
        Some(description) => {
            error!("{}: {}", resolved.main_class, description);
            Err(LaunchError::Exception(description))
        }
        None => outcome,
    }
}

fn invoke_main<S: VmSession>(
    session: &mut S,
    class_name: &str,
    args: &[String],
) -> Result<(), LaunchError> {
    let class = session
        .find_class(&binary_class_name(class_name))
        .map_err(|source| LaunchError::ClassNotFound {
            class: class_name.to_string(),
            source,
        })?;

    let method = session
        .static_method(&class, MAIN_METHOD, MAIN_SIGNATURE)
        .map_err(|source| LaunchError::MethodNotFound {
            class: class_name.to_string(),
            source,
        })?;

    let array = marshal_args(session, args).map_err(LaunchError::Arguments)?;

    session
        .call_static_void(&class, &method, &array)
        .map_err(|source| LaunchError::Invocation {
            class: class_name.to_string(),
            source,
        })
}

/// Build the guest's `String[] args`, stopping at the first failure
fn marshal_args<S: VmSession>(session: &mut S, args: &[String]) -> Result<S::StringArray, VmError> {
    let array = session.new_string_array(args.len())?;
    for (index, arg) in args.iter().enumerate() {
        session.set_string_element(&array, index, arg)?;
    }
    Ok(array)
}

/// [`launch`], collapsed to an exit code: 0 on success, -1 otherwise
///
/// The guest's own `System.exit` status is not observed here.
pub fn run<P: VmProvider>(provider: &P, config: &LaunchConfig) -> i32 {
    match launch(provider, config) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            warn!("launch failed: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Launch a jar with only its arguments set
pub fn run_jar<P: VmProvider>(provider: &P, jar_path: &str, args: &[String]) -> i32 {
    run(provider, &LaunchConfig::for_jar(jar_path, args.iter().cloned()))
}
