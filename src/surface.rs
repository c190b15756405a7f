//! Display surfaces scenes are shown on.

use std::sync::Arc;

use winit::window::Window;

/// The single long-lived surface a [`SceneDirector`](crate::SceneDirector) draws to.
pub trait DisplaySurface {
    /// View root type the surface displays.
    type View: Clone + 'static;

    fn set_title(&mut self, title: &str);

    /// Make the surface visible.
    fn reveal(&mut self);

    fn set_content(&mut self, view: Self::View);

    fn current_content(&self) -> Option<&Self::View>;
}

/// A `winit` window showing one view root at a time.
///
/// The window itself only knows about title and visibility; the host's
/// redraw handler paints [`current_content`](DisplaySurface::current_content).
pub struct WindowSurface<V> {
    window: Arc<Window>,
    content: Option<V>,
}

impl<V> WindowSurface<V> {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            content: None,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl<V: Clone + 'static> DisplaySurface for WindowSurface<V> {
    type View = V;

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn reveal(&mut self) {
        self.window.set_visible(true);
        self.window.request_redraw();
    }

    fn set_content(&mut self, view: V) {
        self.content = Some(view);
        self.window.request_redraw();
    }

    fn current_content(&self) -> Option<&V> {
        self.content.as_ref()
    }
}

/// An in-memory surface for hosts without a window.
#[derive(Clone, Debug)]
pub struct HeadlessSurface<V> {
    title: String,
    visible: bool,
    content: Option<V>,
    content_changes: usize,
}

impl<V> HeadlessSurface<V> {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            visible: false,
            content: None,
            content_changes: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// How many times `set_content` has been called.
    pub fn content_changes(&self) -> usize {
        self.content_changes
    }
}

impl<V> Default for HeadlessSurface<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + 'static> DisplaySurface for HeadlessSurface<V> {
    type View = V;

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn reveal(&mut self) {
        self.visible = true;
    }

    fn set_content(&mut self, view: V) {
        self.content = Some(view);
        self.content_changes += 1;
    }

    fn current_content(&self) -> Option<&V> {
        self.content.as_ref()
    }
}
