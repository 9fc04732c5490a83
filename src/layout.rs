//! Page shell: fills `layout.html` and ships the motion assets.
//!
//! Rows are rendered at rest on the server. In the browser the motion script
//! runs the same spring (constants come from [`MotionConfig`]) and retargets
//! it on every pointer enter/leave. Without the script, a CSS transition
//! sampled from the spring gives a close approximation.

use htmlescape::encode_minimal;
use serde::Serialize;
use tracing::error;

use crate::row::ACTIVE_OFFSET;
use crate::spring::SpringConfig;

const HOT_RELOAD_SCRIPT: &str = r#"
<script>
    const socket = new WebSocket("ws://" + window.location.host + "/ws");
    socket.onmessage = (event) => {
        if (event.data === "reload") {
            window.location.reload();
        }
    };
</script>
"#;

const MOTION_SCRIPT: &str = r#"
<script>
(() => {
    const config = JSON.parse(document.getElementById("motion-config").textContent);
    const spring = config.spring;
    const STEP = 1 / 1000;
    document.documentElement.dataset.motion = "js";

    function motionValue(apply) {
        const v = { position: 0, velocity: 0, target: null, apply };
        v.set = (target) => {
            if (v.target === null && Math.abs(v.position - target) <= spring.rest_delta && Math.abs(v.velocity) <= spring.rest_speed) {
                v.position = target;
                return false;
            }
            v.target = target;
            return true;
        };
        v.step = (dt) => {
            if (v.target === null) return;
            const n = Math.max(1, Math.ceil(dt / STEP));
            const h = dt / n;
            for (let i = 0; i < n; i++) {
                const a = (-spring.stiffness * (v.position - v.target) - spring.damping * v.velocity) / spring.mass;
                v.velocity += a * h;
                v.position += v.velocity * h;
                if (Math.abs(v.position - v.target) <= spring.rest_delta && Math.abs(v.velocity) <= spring.rest_speed) {
                    v.position = v.target;
                    v.velocity = 0;
                    v.target = null;
                    break;
                }
            }
            v.apply(v.position);
        };
        return v;
    }

    function mountRow(li) {
        const accent = li.querySelector("[data-motion=accent]");
        const arrow = li.querySelector("[data-motion=arrow]");
        const link = li.querySelector("a");
        const values = [
            motionValue((x) => { accent.style.width = x + "px"; }),
            motionValue((x) => { arrow.style.transform = "translateX(" + x + "px)"; }),
        ];
        let focused = false;
        let frame = null;
        let last = null;

        const loop = (now) => {
            const dt = last === null ? 1 / 60 : Math.min((now - last) / 1000, 0.1);
            last = now;
            values.forEach((v) => v.step(dt));
            frame = values.some((v) => v.target !== null) ? requestAnimationFrame(loop) : null;
            if (frame === null) last = null;
        };

        const setFocused = (next) => {
            if (next === focused) return;
            focused = next;
            const target = focused ? config.active_offset : 0;
            for (const el of [accent, link]) {
                el.classList.toggle("bg-gray5", focused);
                el.classList.toggle("bg-gray4", !focused);
            }
            values.forEach((v) => v.set(target));
            if (frame === null) frame = requestAnimationFrame(loop);
        };

        li.addEventListener("pointerenter", () => setFocused(true));
        li.addEventListener("pointerleave", () => setFocused(false));
    }

    async function navigate(path, push = true) {
        try {
            const response = await fetch(path, { headers: { Accept: "text/html" } });
            if (!response.ok) throw new Error(response.status);
            const doc = new DOMParser().parseFromString(await response.text(), "text/html");
            document.title = doc.title;
            document.body.replaceWith(doc.body);
            if (push) history.pushState({}, "", path);
            window.scrollTo(0, 0);
            mountAll();
        } catch (_) {
            location.assign(path);
        }
    }

    function mountAll() {
        document.querySelectorAll("li[data-key]").forEach(mountRow);
        document.querySelectorAll("a[data-link=internal]").forEach((a) => {
            a.addEventListener("click", (event) => {
                if (event.button !== 0 || event.metaKey || event.ctrlKey || event.shiftKey || event.altKey) return;
                event.preventDefault();
                navigate(a.getAttribute("href"));
            });
        });
    }

    window.addEventListener("popstate", () => navigate(location.pathname, false));
    mountAll();
})();
</script>
"#;

/// What the motion script needs to reproduce row behaviour client-side.
#[derive(Debug, Clone, Serialize)]
pub struct MotionConfig {
    pub spring: SpringConfig,
    pub active_offset: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            spring: SpringConfig::HOVER,
            active_offset: ACTIVE_OFFSET,
        }
    }
}

impl MotionConfig {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            error!("Failed to serialize motion config: {}", e);
            "{}".to_string()
        })
    }

    /// Hover fallback used until (or unless) the motion script takes over.
    pub fn fallback_css(&self) -> String {
        let easing = self.spring.linear_easing(self.active_offset, 32);
        let duration_ms = easing.duration.as_millis();
        format!(
            concat!(
                "<style>",
                "html:not([data-motion=js]) li[data-key] [data-motion=accent] {{ transition: width {ms}ms {easing}; }}",
                "html:not([data-motion=js]) li[data-key] [data-motion=arrow] {{ transition: transform {ms}ms {easing}; }}",
                "html:not([data-motion=js]) li[data-key]:hover [data-motion=accent] {{ width: {offset}px !important; }}",
                "html:not([data-motion=js]) li[data-key]:hover [data-motion=arrow] {{ transform: translateX({offset}px) !important; }}",
                "</style>"
            ),
            ms = duration_ms,
            easing = easing,
            offset = self.active_offset
        )
    }

    /// Everything that goes into `{{ head }}`.
    pub fn head_html(&self) -> String {
        format!(
            "{}<script type=\"application/json\" id=\"motion-config\">{}</script>",
            self.fallback_css(),
            self.to_json()
        )
    }
}

/// Fills the layout placeholders. In development the hot-reload client is
/// appended before `</body>`.
///
/// Only the layout itself is scanned: text substituted into it (a title, a
/// post body) is never expanded again.
pub fn render_with_layout(layout: &str, title: &str, content: &str, is_development: bool) -> String {
    let motion = MotionConfig::default();
    let title = encode_minimal(title);
    let head = motion.head_html();
    let lookup = |name: &str| match name {
        "title" => Some(title.as_str()),
        "head" => Some(head.as_str()),
        "content" => Some(content),
        _ => None,
    };

    let Some(body_close) = layout.rfind("</body>") else {
        return fill_placeholders(layout, lookup);
    };
    let (before, after) = layout.split_at(body_close);

    let mut page = fill_placeholders(before, lookup);
    page.push_str(MOTION_SCRIPT);
    if is_development {
        page.push_str(HOT_RELOAD_SCRIPT);
    }
    page.push_str(&fill_placeholders(after, lookup));
    page
}

/// Single pass over `{{ name }}` markers. Unknown names are kept verbatim.
fn fill_placeholders<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(len) = rest[open..].find("}}") else {
            break;
        };
        let marker = &rest[open..open + len + 2];
        out.push_str(&rest[..open]);
        match lookup(marker[2..marker.len() - 2].trim()) {
            Some(value) => out.push_str(value),
            None => out.push_str(marker),
        }
        rest = &rest[open + len + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str =
        "<html><head><title>{{ title }}</title>{{ head }}</head><body>{{ content }}</body></html>";

    #[test]
    fn fills_placeholders() {
        let page = render_with_layout(LAYOUT, "Home & Away", "<main>hi</main>", false);
        assert!(page.contains("<title>Home &amp; Away</title>"));
        assert!(page.contains("<main>hi</main>"));
        assert!(page.contains("id=\"motion-config\""));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn substituted_text_is_not_expanded_again() {
        let page = render_with_layout(LAYOUT, "{{ head }}", "<p>{{ title }} {{ content }}</p>", false);
        assert!(page.contains("<title>{{ head }}</title>"));
        assert!(page.contains("<p>{{ title }} {{ content }}</p>"));
        assert_eq!(page.matches("id=\"motion-config\"").count(), 1);
    }

    #[test]
    fn body_close_inside_content_is_left_alone() {
        let page = render_with_layout(LAYOUT, "t", "<pre>&lt;/body&gt; </body></pre>", false);
        assert_eq!(page.matches("JSON.parse").count(), 1);
        assert!(page.ends_with("</script>\n</body></html>"));
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let page = render_with_layout("<body>{{ footer }}{{content}}</body>", "t", "x", false);
        assert!(page.starts_with("<body>{{ footer }}x"));
    }

    #[test]
    fn hot_reload_only_in_development() {
        let prod = render_with_layout(LAYOUT, "t", "", false);
        let dev = render_with_layout(LAYOUT, "t", "", true);
        assert!(!prod.contains("new WebSocket"));
        assert!(dev.contains("new WebSocket"));
        assert!(dev.ends_with("</script>\n</body></html>"));
    }

    #[test]
    fn motion_config_carries_spring_constants() {
        let json: serde_json::Value = serde_json::from_str(&MotionConfig::default().to_json()).unwrap();
        assert_eq!(json["active_offset"], 16.0);
        assert_eq!(json["spring"]["stiffness"], 26.7);
        assert_eq!(json["spring"]["damping"], 4.1);
        assert_eq!(json["spring"]["mass"], 0.2);
    }

    #[test]
    fn fallback_css_uses_sampled_spring() {
        let css = MotionConfig::default().fallback_css();
        assert!(css.contains("linear(0.0000, "));
        assert!(css.contains("width: 16px"));
        assert!(css.contains("translateX(16px)"));
    }
}
