//! Spinner widget for picking one option from a list.
//!
//! The spinner is controlled: the host owns the selected index and passes it
//! in on every render. Picking a row does not change what the spinner shows;
//! it returns a [`SpinnerIndexChanged`] message and the host rebuilds the
//! spinner from its updated state.

use serde::{Deserialize, Serialize};
use spa_core::{
    widget::LayoutResult, AccessibleRole, Canvas, Color, Constraints, Event, FontWeight, Key,
    Message, MouseButton, Point, Rect, Size, TextStyle, Theme, TypeId, Widget,
};
use thiserror::Error;
use tracing::debug;

/// Width reserved for the dropdown arrow.
const ARROW_WIDTH: f32 = 10.0;
/// Height of the dropdown arrow.
const ARROW_HEIGHT: f32 = 5.0;

/// Message emitted when the user picks an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinnerIndexChanged {
    /// Index of the picked option
    pub index: usize,
}

/// Contract violations detected when building a spinner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinnerError {
    /// The option list is empty, so nothing can be selected
    #[error("spinner requires at least one option")]
    EmptyOptions,
    /// The selected index does not name an option
    #[error("selected index {index} is out of range for {len} options")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Number of options
        len: usize,
    },
}

/// Visual parameters of a spinner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinnerStyle {
    /// Header background
    pub background: Color,
    /// Header and menu border
    pub border: Color,
    /// Menu panel background
    pub menu_background: Color,
    /// Background of the row holding the current selection
    pub selected_background: Color,
    /// Background of the hovered or keyboard-highlighted row
    pub highlight_background: Color,
    /// Label color
    pub text: Color,
    /// Color used for everything when disabled
    pub disabled: Color,
    /// Label font size
    pub text_size: f32,
    /// Height of the header and of each menu row
    pub item_height: f32,
    /// Horizontal padding
    pub padding: f32,
    /// Minimum header width
    pub min_width: f32,
}

impl Default for SpinnerStyle {
    fn default() -> Self {
        Self::from_theme(&Theme::light())
    }
}

impl SpinnerStyle {
    /// Derive a style from a theme.
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        let colors = &theme.colors;
        let text_size = theme.typography.body_size;
        Self {
            background: colors.surface,
            border: colors.outline,
            menu_background: colors.surface,
            selected_background: colors.surface_variant,
            highlight_background: colors.primary.with_alpha(0.12),
            text: colors.on_surface,
            disabled: colors.disabled,
            text_size,
            item_height: text_size * 3.0,
            padding: theme.spacing.md(),
            min_width: 120.0,
        }
    }

    fn text_style(&self, color: Color) -> TextStyle {
        TextStyle {
            size: self.text_size,
            color,
            weight: FontWeight::Normal,
        }
    }
}

/// Dropdown selector over a fixed list of string options.
#[derive(Debug)]
pub struct Spinner {
    options: Vec<String>,
    selected: usize,
    expanded: bool,
    highlighted: Option<usize>,
    disabled: bool,
    style: SpinnerStyle,
    test_id_value: Option<String>,
    accessible_name_value: Option<String>,
    bounds: Rect,
}

impl Spinner {
    /// Create a spinner showing `options[selected]`.
    pub fn new(options: Vec<String>, selected: usize) -> Result<Self, SpinnerError> {
        if options.is_empty() {
            return Err(SpinnerError::EmptyOptions);
        }
        if selected >= options.len() {
            return Err(SpinnerError::InvalidIndex {
                index: selected,
                len: options.len(),
            });
        }

        Ok(Self {
            options,
            selected,
            expanded: false,
            highlighted: None,
            disabled: false,
            style: SpinnerStyle::default(),
            test_id_value: None,
            accessible_name_value: None,
            bounds: Rect::default(),
        })
    }

    /// Create a spinner from anything yielding strings.
    pub fn from_strings(
        options: impl IntoIterator<Item = impl Into<String>>,
        selected: usize,
    ) -> Result<Self, SpinnerError> {
        Self::new(options.into_iter().map(Into::into).collect(), selected)
    }

    /// Replace the style.
    #[must_use]
    pub fn style(mut self, style: SpinnerStyle) -> Self {
        self.style = style;
        self
    }

    /// Take colors and metrics from a theme.
    #[must_use]
    pub fn theme(self, theme: &Theme) -> Self {
        self.style(SpinnerStyle::from_theme(theme))
    }

    /// Set minimum width.
    #[must_use]
    pub fn min_width(mut self, width: f32) -> Self {
        self.style.min_width = width.max(50.0);
        self
    }

    /// Set header and row height.
    #[must_use]
    pub fn item_height(mut self, height: f32) -> Self {
        self.style.item_height = height.max(20.0);
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// All options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Number of options.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Index passed in by the host.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Label currently shown in the header.
    #[must_use]
    pub fn selected_label(&self) -> &str {
        &self.options[self.selected]
    }

    /// Whether the menu is open.
    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Row under the pointer or keyboard highlight while expanded.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Current style.
    #[must_use]
    pub const fn current_style(&self) -> &SpinnerStyle {
        &self.style
    }

    /// Bounds of the always-visible header.
    #[must_use]
    pub fn header_bounds(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.style.item_height,
        )
    }

    /// Bounds of menu row `index`, whether or not the menu is open.
    #[must_use]
    pub fn row_bounds(&self, index: usize) -> Option<Rect> {
        (index < self.options.len()).then(|| {
            let y = (index as f32 + 1.0).mul_add(self.style.item_height, self.bounds.y);
            Rect::new(self.bounds.x, y, self.bounds.width, self.style.item_height)
        })
    }

    fn menu_bounds(&self) -> Rect {
        let header = self.header_bounds();
        Rect::new(
            header.x,
            header.bottom(),
            header.width,
            self.options.len() as f32 * self.style.item_height,
        )
    }

    fn row_at(&self, position: &Point) -> Option<usize> {
        if !self.expanded {
            return None;
        }
        let menu = self.menu_bounds();
        if !menu.contains_point(position) {
            return None;
        }
        let index = ((position.y - menu.y) / self.style.item_height) as usize;
        (index < self.options.len()).then_some(index)
    }

    fn expand(&mut self) {
        self.expanded = true;
        self.highlighted = Some(self.selected);
        debug!(selected = self.selected, "spinner expanded");
    }

    fn dismiss(&mut self) {
        if self.expanded {
            self.expanded = false;
            self.highlighted = None;
            debug!("spinner dismissed");
        }
    }

    fn pick(&mut self, index: usize) -> Option<Message> {
        self.expanded = false;
        self.highlighted = None;
        debug!(
            from = self.selected,
            to = index,
            "spinner selection requested"
        );
        Some(Box::new(SpinnerIndexChanged { index }))
    }

    fn move_highlight(&mut self, target: usize) {
        self.highlighted = Some(target.min(self.options.len() - 1));
    }

    fn handle_key(&mut self, key: Key) -> Option<Message> {
        if !self.expanded {
            if matches!(key, Key::Enter | Key::Space | Key::Down | Key::Up) {
                self.expand();
            }
            return None;
        }

        let current = self.highlighted.unwrap_or(self.selected);
        match key {
            Key::Enter | Key::Space => return self.pick(current),
            Key::Escape | Key::Tab => self.dismiss(),
            Key::Down => self.move_highlight(current + 1),
            Key::Up => self.move_highlight(current.saturating_sub(1)),
            Key::Home => self.move_highlight(0),
            Key::End => self.move_highlight(self.options.len() - 1),
            Key::Left | Key::Right => {}
        }
        None
    }

    fn label_position(&self, row: Rect) -> Point {
        Point::new(
            row.x + self.style.padding,
            row.y + (self.style.item_height - self.style.text_size) / 2.0,
        )
    }

    fn arrow_points(&self) -> [Point; 3] {
        let header = self.header_bounds();
        let right = header.x + header.width - self.style.padding;
        let left = right - ARROW_WIDTH;
        let mid_y = header.center().y;
        let half = ARROW_HEIGHT / 2.0;
        if self.expanded {
            [
                Point::new(left, mid_y + half),
                Point::new(right, mid_y + half),
                Point::new(left + ARROW_WIDTH / 2.0, mid_y - half),
            ]
        } else {
            [
                Point::new(left, mid_y - half),
                Point::new(right, mid_y - half),
                Point::new(left + ARROW_WIDTH / 2.0, mid_y + half),
            ]
        }
    }
}

impl Widget for Spinner {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let label_style = self.style.text_style(self.style.text);
        let widest = self
            .options
            .iter()
            .map(|o| label_style.measure(o).width)
            .fold(0.0_f32, f32::max);
        let width = self
            .style
            .padding
            .mul_add(3.0, widest + ARROW_WIDTH)
            .max(self.style.min_width);
        constraints.constrain(Size::new(width, self.style.item_height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let header = self.header_bounds();
        let foreground = if self.disabled {
            self.style.disabled
        } else {
            self.style.text
        };
        let label_style = self.style.text_style(foreground);

        canvas.fill_rect(header, self.style.background);
        canvas.stroke_rect(header, self.style.border, 1.0);
        canvas.draw_text(
            self.selected_label(),
            self.label_position(header),
            &label_style,
        );
        canvas.fill_polygon(&self.arrow_points(), foreground);

        if !self.expanded {
            return;
        }

        let menu = self.menu_bounds();
        canvas.fill_rect(menu, self.style.menu_background);
        canvas.stroke_rect(menu, self.style.border, 1.0);

        for (i, option) in self.options.iter().enumerate() {
            let Some(row) = self.row_bounds(i) else {
                continue;
            };
            if i == self.selected {
                canvas.fill_rect(row, self.style.selected_background);
            } else if Some(i) == self.highlighted {
                canvas.fill_rect(row, self.style.highlight_background);
            }
            canvas.draw_text(option, self.label_position(row), &label_style);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Message> {
        if self.disabled {
            return None;
        }

        match event {
            Event::MouseMove { position } => {
                if self.expanded {
                    self.highlighted = self.row_at(position);
                }
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                if self.header_bounds().contains_point(position) {
                    if self.expanded {
                        self.dismiss();
                    } else {
                        self.expand();
                    }
                } else if let Some(index) = self.row_at(position) {
                    return self.pick(index);
                } else {
                    self.dismiss();
                }
            }
            Event::KeyDown { key } => return self.handle_key(*key),
            Event::FocusOut => self.dismiss(),
            _ => {}
        }

        None
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn is_interactive(&self) -> bool {
        !self.disabled
    }

    fn is_focusable(&self) -> bool {
        !self.disabled
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value
            .as_deref()
            .or_else(|| Some(self.selected_label()))
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ComboBox
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
