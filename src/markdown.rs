use pulldown_cmark::{html, CowStr, Event, Options, Parser};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_MATH);
    options
}

/// Renders a post body. Math in `$...$`, `$$...$$`, `\(...\)` or `\[...\]`
/// becomes katex markup.
pub fn render_markdown_to_html(markdown: &str) -> String {
    let markdown = latex_to_dollar_math(markdown);
    let parser = Parser::new_ext(&markdown, markdown_options()).map(|event| match event {
        Event::InlineMath(math) => Event::Html(CowStr::from(render_math(&math, false))),
        Event::DisplayMath(math) => Event::Html(CowStr::from(render_math(&math, true))),
        other => other,
    });

    let mut html_out = String::new();
    html::push_html(&mut html_out, parser);
    html_out
}

/// Rewrites `\(x\)` to `$x$` and `\[x\]` to `$$x$$`. Inline math that spans
/// lines is promoted to display math. Unclosed openers are left as written.
fn latex_to_dollar_math(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('\\') {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);

        let close = if tail.starts_with("\\(") {
            Some(("\\)", false))
        } else if tail.starts_with("\\[") {
            Some(("\\]", true))
        } else {
            None
        };

        let rewritten = close.and_then(|(close, display)| {
            let body = &tail[2..];
            body.find(close).map(|end| {
                let math = &body[..end];
                let fence = if display || math.contains('\n') { "$$" } else { "$" };
                out.push_str(fence);
                out.push_str(math);
                out.push_str(fence);
                &body[end + close.len()..]
            })
        });

        match rewritten {
            Some(after) => rest = after,
            None => {
                out.push('\\');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn render_math(source: &str, display_mode: bool) -> String {
    let rendered = katex::Opts::builder()
        .display_mode(display_mode)
        .build()
        .ok()
        .and_then(|opts| katex::render_with_opts(source, opts).ok());

    rendered.unwrap_or_else(|| {
        let class_name = if display_mode { "math math-display" } else { "math math-inline" };
        format!(
            "<span class=\"{}\">{}</span>",
            class_name,
            htmlescape::encode_minimal(source)
        )
    })
}
