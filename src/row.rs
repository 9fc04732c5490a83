//! A single post entry in the home page list.
//!
//! Each row has its own hover state. Entering the row focuses it and pushes
//! both affordances (the accent bar to the right of the row and the arrow
//! icon) out to [`ACTIVE_OFFSET`]; leaving pulls them back to 0. Rows never
//! share state.

use htmlescape::encode_minimal;

use crate::dates::format_long_date;
use crate::models::{ImageRef, Post};
use crate::spring::{MotionValue, SpringConfig};

/// Accent bar width and arrow offset while a row is focused.
pub const ACTIVE_OFFSET: f64 = 16.0;

const ARROW_SVG: &str = concat!(
    "<svg width=\"24\" height=\"24\" fill=\"none\" viewBox=\"0 0 24 24\" aria-hidden=\"true\">",
    "<path stroke=\"currentColor\" stroke-linecap=\"round\" stroke-linejoin=\"round\" stroke-width=\"1.5\" d=\"M13.75 6.75L19.25 12L13.75 17.25\"/>",
    "<path stroke=\"currentColor\" stroke-linecap=\"round\" stroke-linejoin=\"round\" stroke-width=\"1.5\" d=\"M19 12H4.75\"/>",
    "</svg>"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Unfocused,
    Focused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Exit,
}

impl Focus {
    pub fn next(self, event: PointerEvent) -> Focus {
        match event {
            PointerEvent::Enter => Focus::Focused,
            PointerEvent::Exit => Focus::Unfocused,
        }
    }

    /// Where both animated values head in this state.
    pub fn target(self) -> f64 {
        match self {
            Focus::Focused => ACTIVE_OFFSET,
            Focus::Unfocused => 0.0,
        }
    }

    pub fn background_class(self) -> &'static str {
        match self {
            Focus::Focused => "bg-gray5",
            Focus::Unfocused => "bg-gray4",
        }
    }
}

/// Interaction state for one row. Dropping it discards any running animation.
#[derive(Debug, Clone)]
pub struct PostRow {
    focus: Focus,
    accent_width: MotionValue,
    arrow_offset: MotionValue,
}

impl PostRow {
    pub fn new() -> Self {
        PostRow::with_spring(SpringConfig::HOVER)
    }

    pub fn with_spring(config: SpringConfig) -> Self {
        PostRow {
            focus: Focus::Unfocused,
            accent_width: MotionValue::new(config, 0.0),
            arrow_offset: MotionValue::new(config, 0.0),
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn accent_width(&self) -> &MotionValue {
        &self.accent_width
    }

    pub fn arrow_offset(&self) -> &MotionValue {
        &self.arrow_offset
    }

    /// Applies a pointer event. Returns true if the focus changed.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        let next = self.focus.next(event);
        if next == self.focus {
            return false;
        }
        self.focus = next;
        let target = next.target();
        self.accent_width.set_target(target);
        self.arrow_offset.set_target(target);
        true
    }

    /// Advances both animations by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.accent_width.step(dt);
        self.arrow_offset.step(dt);
    }

    pub fn is_settled(&self) -> bool {
        !self.accent_width.is_animating() && !self.arrow_offset.is_animating()
    }
}

impl Default for PostRow {
    fn default() -> Self {
        PostRow::new()
    }
}

/// Renders one `<li>` for `post`, reflecting `row`'s current state.
pub fn render_row(post: &Post, row: &PostRow) -> String {
    let background = row.focus().background_class();
    let target = post.link_target();

    let accent = format!(
        "<div data-motion=\"accent\" class=\"w-px border border-gray8 border-l-0 absolute -top-px -bottom-px left-full z-10 hidden lg:block {}\" style=\"width: {:.2}px\"></div>",
        background,
        row.accent_width().get()
    );

    let mut children = String::new();
    children.push_str(&format!(
        "<img class=\"shrink-0 h-min\" src=\"{}\" width=\"{}\" height=\"{}\" alt=\"\">",
        encode_minimal(&post.image.src),
        ImageRef::WIDTH,
        ImageRef::HEIGHT
    ));
    children.push_str(&format!(
        concat!(
            "<div class=\"space-y-4 xl:flex xl:space-y-0 xl:gap-10\">",
            "<header class=\"basis-[270px] flex flex-col shrink-0 gap-2 z-20\">",
            "<h1 class=\"font-serif text-3xl leading-[1.3]\">{}</h1>",
            "<p class=\"text-gray11 text-sm\"><time datetime=\"{}\">{}</time></p>",
            "</header>",
            "<article class=\"grow\"><p class=\"max-w-[450px]\">{}</p></article>",
            "</div>"
        ),
        encode_minimal(&post.title),
        post.edited_at.format("%Y-%m-%d"),
        format_long_date(post.edited_at),
        encode_minimal(&post.description)
    ));
    children.push_str(&format!(
        "<div data-motion=\"arrow\" class=\"flex items-start lg:items-center ml-auto gap-4\" style=\"transform: translateX({:.2}px)\">{}</div>",
        row.arrow_offset().get(),
        ARROW_SVG
    ));

    let wrapper_class = format!(
        "lg:p-10 lg:gap-10 block space-y-4 md:flex md:space-y-0 md:gap-8 p-6 relative {}",
        background
    );
    let link = target.wrapper().render(&wrapper_class, &children);

    format!(
        "<li class=\"relative\" data-key=\"{}\">{}{}</li>",
        encode_minimal(&post.slug),
        accent,
        link
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FRAME: f64 = 1.0 / 60.0;

    fn post(slug: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: "Tries & <Heaps>".to_string(),
            description: "A look at priority queues".to_string(),
            image: ImageRef {
                src: "/static/heap.png".to_string(),
            },
            edited_at: NaiveDate::from_ymd_opt(2021, 3, 5).unwrap(),
            body: None,
        }
    }

    fn settle(row: &mut PostRow) {
        let mut frames = 0;
        while !row.is_settled() && frames < 600 {
            row.tick(FRAME);
            frames += 1;
        }
    }

    #[test]
    fn starts_unfocused_at_rest() {
        let row = PostRow::new();
        assert_eq!(row.focus(), Focus::Unfocused);
        assert_eq!(row.accent_width().get(), 0.0);
        assert_eq!(row.arrow_offset().get(), 0.0);
        assert!(row.is_settled());
    }

    #[test]
    fn enter_and_exit_toggle_focus() {
        let mut row = PostRow::new();
        assert!(row.handle(PointerEvent::Enter));
        assert_eq!(row.focus(), Focus::Focused);
        assert!(!row.handle(PointerEvent::Enter));
        assert!(row.handle(PointerEvent::Exit));
        assert_eq!(row.focus(), Focus::Unfocused);
        assert!(!row.handle(PointerEvent::Exit));
    }

    #[test]
    fn targets_follow_focus() {
        let mut row = PostRow::new();
        row.handle(PointerEvent::Enter);
        assert_eq!(row.accent_width().target(), 16.0);
        assert_eq!(row.arrow_offset().target(), 16.0);

        row.tick(0.1);
        row.handle(PointerEvent::Exit);
        assert_eq!(row.accent_width().target(), 0.0);
        assert_eq!(row.arrow_offset().target(), 0.0);
    }

    #[test]
    fn focused_row_settles_at_active_offset() {
        let mut row = PostRow::new();
        row.handle(PointerEvent::Enter);
        settle(&mut row);
        assert!(row.is_settled());
        assert_eq!(row.accent_width().get(), ACTIVE_OFFSET);
        assert_eq!(row.arrow_offset().get(), ACTIVE_OFFSET);
    }

    #[test]
    fn enter_then_exit_settles_back_to_zero() {
        let mut row = PostRow::new();
        row.handle(PointerEvent::Enter);
        row.handle(PointerEvent::Exit);
        assert_eq!(row.focus(), Focus::Unfocused);

        settle(&mut row);
        assert!(row.is_settled());
        assert_eq!(row.accent_width().get(), 0.0);
        assert_eq!(row.arrow_offset().get(), 0.0);
    }

    #[test]
    fn rapid_toggling_retargets_a_single_transition() {
        let mut row = PostRow::new();
        row.handle(PointerEvent::Enter);
        row.tick(FRAME);

        for i in 0..10 {
            let velocity = row.accent_width().velocity();
            let position = row.accent_width().get();
            let event = if i % 2 == 0 {
                PointerEvent::Exit
            } else {
                PointerEvent::Enter
            };
            row.handle(event);

            assert_eq!(row.accent_width().active_transitions(), 1);
            assert_eq!(row.arrow_offset().active_transitions(), 1);
            assert_eq!(row.accent_width().velocity(), velocity);
            assert_eq!(row.accent_width().get(), position);

            row.tick(FRAME / 4.0);
        }

        // ten toggles starting from focused land back on focused
        assert_eq!(row.focus(), Focus::Focused);
        settle(&mut row);
        assert_eq!(row.accent_width().get(), ACTIVE_OFFSET);
    }

    #[test]
    fn rows_do_not_share_state() {
        let mut a = PostRow::new();
        let b = PostRow::new();
        a.handle(PointerEvent::Enter);
        a.tick(0.2);
        assert_eq!(b.focus(), Focus::Unfocused);
        assert_eq!(b.accent_width().get(), 0.0);
    }

    #[test]
    fn renders_initial_row_markup() {
        let html = render_row(&post("/tries"), &PostRow::new());
        assert!(html.starts_with("<li class=\"relative\" data-key=\"/tries\">"));
        assert!(html.contains("style=\"width: 0.00px\""));
        assert!(html.contains("translateX(0.00px)"));
        assert!(html.contains("bg-gray4"));
        assert!(!html.contains("bg-gray5"));
        assert!(html.contains("March 5, 2021"));
        assert!(html.contains("width=\"80\" height=\"80\""));
        assert!(html.contains("Tries &amp; &lt;Heaps&gt;"));
    }

    #[test]
    fn rendered_wrapper_follows_slug() {
        let internal = render_row(&post("/my-post"), &PostRow::new());
        assert!(internal.contains("<a href=\"/my-post\""));
        assert!(internal.contains("data-link=\"internal\""));

        let external = render_row(&post("https://example.com/post"), &PostRow::new());
        assert!(external.contains("<a href=\"https://example.com/post\""));
        assert!(!external.contains("data-link=\"internal\""));
    }

    #[test]
    fn focused_row_renders_with_highlight() {
        let mut row = PostRow::new();
        row.handle(PointerEvent::Enter);
        settle(&mut row);
        let html = render_row(&post("/tries"), &row);
        assert!(html.contains("bg-gray5"));
        assert!(html.contains("style=\"width: 16.00px\""));
        assert!(html.contains("translateX(16.00px)"));
    }
}
