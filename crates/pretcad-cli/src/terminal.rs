//! Terminal implementations of the bridge capabilities.

use console::style;
use pretcad_bridge::{FormSurface, MemoryForm, Navigator, Notifier, SelectedFile};
use pretcad_common::models::field;
use url::Url;

/// In-memory form that echoes status region updates to stderr.
#[derive(Debug, Default)]
pub struct ConsoleForm {
    inner: MemoryForm,
}

impl ConsoleForm {
    pub fn new() -> Self { Self::default() }

    pub fn select_file(&self, file: SelectedFile) {
        self.inner.select_file(field::CIF_FILE, file);
    }
}

fn is_status_region(name: &str) -> bool {
    name == field::STATUS || name == field::CIF_STATUS
}

impl FormSurface for ConsoleForm {
    fn field(&self, name: &str) -> Option<String> {
        self.inner.field(name)
    }

    fn set_field(&self, name: &str, value: &str) {
        if is_status_region(name) {
            eprintln!("{} {}", style("»").cyan().bold(), value);
        }
        self.inner.set_field(name, value);
    }

    fn selected_file(&self, name: &str) -> Option<SelectedFile> {
        self.inner.selected_file(name)
    }
}

/// The results page is not served from the terminal; the target is shown and
/// the stored exchange rendered in its place.
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: &Url) {
        eprintln!("{} {}", style("→ results page:").dim(), target);
    }
}

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", style("⚠").red().bold(), style(message).red());
    }
}
