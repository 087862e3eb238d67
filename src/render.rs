//! Markdown rendering with comrak.
//!
//! Produces an HTML fragment from raw markdown text. Three syntax
//! extensions from the source documents are supported on top of comrak's
//! own feature set: `::: warning` containers, trailing `{...}` attribute
//! annotations on blocks and images, and footnotes. Rendering is pure and
//! deterministic; malformed markup degrades to literal output instead of
//! erroring.

use comrak::{Options, markdown_to_html};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Render markdown source to an HTML fragment.
pub fn render_fragment(source: &str) -> String {
    let expanded = expand_warning_containers(source);
    let html = markdown_to_html(&expanded, &create_options());
    let html = apply_image_attrs(&html);
    apply_block_attrs(&html)
}

fn create_options() -> Options {
    let mut options = Options::default();

    // Tables and strikethrough match the dialect the documents are
    // written in; footnotes are an explicit extension.
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.footnotes = true;

    // The container pre-pass injects raw <div> blocks, which must pass
    // through unescaped. Fragments are trusted HTML throughout.
    options.render.unsafe_ = true;

    options
}

/// Rewrite `::: warning` / `:::` fences into `<div class="warning">` HTML
/// blocks before parsing.
///
/// Lines inside backtick or tilde code fences are left untouched. An
/// unmatched closing fence stays literal; unclosed containers are closed
/// at end of input.
fn expand_warning_containers(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 32);
    let mut depth = 0usize;
    let mut code_fence: Option<char> = None;

    for line in source.lines() {
        let trimmed = line.trim_start();

        if let Some(marker) = code_fence {
            // A closing fence is a marker run with nothing after it;
            // ```rust inside an open fence is content, not a closer.
            let run = trimmed.chars().take_while(|&c| c == marker).count();
            if run >= 3 && trimmed[run..].trim().is_empty() {
                code_fence = None;
            }
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            code_fence = trimmed.chars().next();
            out.push_str(line);
            out.push('\n');
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix(":::") {
            let info = rest.trim();
            if info.split_whitespace().next() == Some("warning") {
                depth += 1;
                out.push_str("<div class=\"warning\">\n\n");
                continue;
            }
            if info.is_empty() && depth > 0 {
                depth -= 1;
                out.push_str("\n</div>\n");
                continue;
            }
        }

        out.push_str(line);
        out.push('\n');
    }

    for _ in 0..depth {
        out.push_str("\n</div>\n");
    }
    out
}

static BLOCK_ATTRS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*\{([^{}\n]+)\}</(p|h[1-6]|li)>").expect("valid block attr pattern")
});

static IMAGE_ATTRS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<img [^<>]*?)\s*(/?)>\{([^{}\n]+)\}").expect("valid image attr pattern")
});

/// Move a trailing `{...}` annotation into the enclosing block tag.
///
/// `<h1>Title {.intro}</h1>` becomes `<h1 class="intro">Title</h1>`. The
/// nearest preceding opening tag of the same name is rewritten; comrak
/// never nests these block tags within themselves, so the nearest one is
/// the right one. Annotations that do not parse stay literal.
fn apply_block_attrs(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for caps in BLOCK_ATTRS.captures_iter(html) {
        let whole = caps.get(0).expect("match");
        let Some(attrs) = parse_attr_spec(&caps[1]) else {
            continue;
        };
        let tag = &caps[2];
        out.push_str(&html[last..whole.start()]);
        last = whole.end();

        let open = format!("<{tag}>");
        if let Some(pos) = out.rfind(&open) {
            let rebuilt = format!("<{tag}{}>", format_attrs(&attrs));
            out.replace_range(pos..pos + open.len(), &rebuilt);
            out.push_str(&format!("</{tag}>"));
        } else {
            out.push_str(whole.as_str());
        }
    }
    out.push_str(&html[last..]);
    out
}

/// Apply an inline `{...}` annotation directly following an image tag.
fn apply_image_attrs(html: &str) -> String {
    IMAGE_ATTRS
        .replace_all(html, |caps: &Captures<'_>| {
            parse_attr_spec(&caps[3]).map_or_else(
                || caps[0].to_string(),
                |attrs| {
                    let close = if &caps[2] == "/" { " /" } else { "" };
                    format!("{}{}{close}>", &caps[1], format_attrs(&attrs))
                },
            )
        })
        .into_owned()
}

/// Parse an annotation body: `.class`, `#id` and `key=value` tokens.
///
/// Any token outside that grammar invalidates the whole annotation, which
/// is then left as literal text.
fn parse_attr_spec(spec: &str) -> Option<Vec<(String, String)>> {
    let mut classes: Vec<&str> = Vec::new();
    let mut id: Option<&str> = None;
    let mut extra: Vec<(String, String)> = Vec::new();

    for token in spec.split_whitespace() {
        if let Some(class) = token.strip_prefix('.') {
            if class.is_empty() {
                return None;
            }
            classes.push(class);
        } else if let Some(ident) = token.strip_prefix('#') {
            if ident.is_empty() {
                return None;
            }
            id = Some(ident);
        } else if let Some((key, value)) = token.split_once('=') {
            if key.is_empty() {
                return None;
            }
            extra.push((key.to_string(), value.trim_matches('"').to_string()));
        } else {
            return None;
        }
    }

    if classes.is_empty() && id.is_none() && extra.is_empty() {
        return None;
    }

    let mut attrs = Vec::new();
    if let Some(ident) = id {
        attrs.push(("id".to_string(), ident.to_string()));
    }
    if !classes.is_empty() {
        attrs.push(("class".to_string(), classes.join(" ")));
    }
    attrs.extend(extra);
    Some(attrs)
}

fn format_attrs(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!(" {key}=\"{value}\""))
        .collect()
}
