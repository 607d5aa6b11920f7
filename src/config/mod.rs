mod editor;
mod paths;
mod types;

pub use editor::{resolve_editor, ConfigSource, EditorSource, FileSource};
pub use paths::{kubeconfig_path, PathOrigin};
pub use types::Settings;
