//! Per-grid handle over the table widget mounted in the container
//!
//! Every re-render tears the previous widget instance down before a new one
//! is initialized, so a container never holds two widgets.

use spgrid_core::GridOptions;

use crate::view::GridView;

/// Paging and localisation settings passed to the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOptions {
    pub page_length: usize,
    pub length_menu: Vec<usize>,
    pub language_url: Option<String>,
}

impl From<&GridOptions> for WidgetOptions {
    fn from(options: &GridOptions) -> Self {
        Self {
            page_length: options.page_length,
            length_menu: options.length_menu.clone(),
            language_url: options.language_url.clone(),
        }
    }
}

/// Something that can draw a [`GridView`]
///
/// Implemented by the terminal renderer of the binary and by recording
/// surfaces in tests.
pub trait GridSurface: Send {
    /// Mount a fresh widget showing `view`.
    fn initialize(&mut self, options: &WidgetOptions, view: &GridView);

    /// Redraw the mounted widget in place, e.g. when a row enters edit mode.
    fn update(&mut self, view: &GridView);

    /// Remove the mounted widget.
    fn teardown(&mut self);
}

pub struct WidgetHandle {
    surface: Box<dyn GridSurface>,
    options: WidgetOptions,
    mounted: bool,
}

impl WidgetHandle {
    pub fn new(surface: Box<dyn GridSurface>, options: WidgetOptions) -> Self {
        Self {
            surface,
            options,
            mounted: false,
        }
    }

    /// Tear down the mounted widget, if any. Calling it twice is a no-op.
    pub fn teardown(&mut self) {
        if self.mounted {
            tracing::debug!("Tearing down grid widget");
            self.surface.teardown();
            self.mounted = false;
        }
    }

    /// Mount a widget for `view`, replacing any previous one.
    pub fn initialize(&mut self, view: &GridView) {
        self.teardown();
        self.surface.initialize(&self.options, view);
        self.mounted = true;
    }

    /// Redraw without re-initializing; mounts first if nothing is mounted.
    pub fn update(&mut self, view: &GridView) {
        if self.mounted {
            self.surface.update(view);
        } else {
            self.initialize(view);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }
}

impl Drop for WidgetHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
