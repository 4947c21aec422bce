/// Options shared by every entry of a mirroring run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorOptions {
    /// If true, directory entries are expanded into one link per regular file beneath them
    pub recursive: bool,
}
