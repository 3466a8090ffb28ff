use std::borrow::Cow;

/// Property prefix for the synthesized first option
pub const CLASS_PATH_PROPERTY: &str = "-Djava.class.path=";

/// `JNI_VERSION_1_2`
pub const JNI_VERSION_1_2: i32 = 0x0001_0002;

/// Startup options handed to [`VmProvider::create`](super::VmProvider::create)
///
/// Slot 0 is always the class path property. The remaining slots borrow the
/// caller's extra options without copying them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmOptions<'a> {
    version: i32,
    ignore_unrecognized: bool,
    options: Vec<Cow<'a, str>>,
}

impl<'a> VmOptions<'a> {
    pub fn new(class_path: &str, extra: &'a [String]) -> Self {
        let mut options = Vec::with_capacity(1 + extra.len());
        options.push(Cow::Owned(format!("{}{}", CLASS_PATH_PROPERTY, class_path)));
        options.extend(extra.iter().map(|opt| Cow::Borrowed(opt.as_str())));

        Self {
            version: JNI_VERSION_1_2,
            ignore_unrecognized: true,
            options,
        }
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Unknown options are tolerated rather than aborting the launch
    pub fn ignore_unrecognized(&self) -> bool {
        self.ignore_unrecognized
    }

    /// The synthesized `-Djava.class.path=` option
    pub fn class_path_option(&self) -> &str {
        &self.options[0]
    }

    /// Pass-through options, in configuration order
    pub fn extra(&self) -> &[Cow<'a, str>] {
        &self.options[1..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|opt| opt.as_ref())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Never true: the class path slot is always present
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
