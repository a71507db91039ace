//! Inputs that are cheap to write and expensive to parse naively. Each must
//! render well within the budget; the sizes are large enough that any
//! quadratic rescanning blows through it.

use std::time::{Duration, Instant};

use markdown_cmark_engine::markdown_to_html;
use pretty_assertions::assert_eq;

const BUDGET: Duration = Duration::from_secs(10);

fn render_within_budget(md: &str) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    let start = Instant::now();
    let html = markdown_to_html(md);
    let elapsed = start.elapsed();
    assert!(
        elapsed < BUDGET,
        "rendering {} bytes took {elapsed:?}",
        md.len()
    );
    html
}

#[test]
fn deeply_nested_emphasis() {
    let n = 20_000;
    let md = format!("{}b{}", "*a **a ".repeat(n), " a** a*".repeat(n));
    let html = render_within_budget(&md);
    assert!(html.starts_with("<p><em>a <strong>a <em>a <strong>a "));
    assert!(html.ends_with("a</strong> a</em> a</strong> a</em></p>\n"));
    assert_eq!(html.matches("<em>").count(), n);
    assert_eq!(html.matches("<strong>").count(), n);
}

#[test]
fn emphasis_closers_without_openers() {
    let md = "a_ ".repeat(50_000);
    let html = render_within_budget(&md);
    assert_eq!(html, format!("<p>{}</p>\n", md.trim_end()));
}

#[test]
fn mismatched_openers_and_closers() {
    let md = "*a_ ".repeat(50_000);
    let html = render_within_budget(&md);
    assert_eq!(html, format!("<p>{}</p>\n", md.trim_end()));
}

#[test]
fn closers_blocked_by_rule_of_three() {
    let md = format!("a**b{}", "c* ".repeat(50_000));
    let html = render_within_budget(&md);
    assert_eq!(html, format!("<p>{}</p>\n", md.trim_end()));
}

#[test]
fn unclosed_inline_links() {
    let md = "[a](b".repeat(100_000);
    let html = render_within_budget(&md);
    assert_eq!(html, format!("<p>{md}</p>\n"));
}

#[test]
fn unclosed_pointy_destinations() {
    let md = "[a](<b".repeat(100_000);
    let html = render_within_budget(&md);
    assert_eq!(html, format!("<p>{}</p>\n", md.replace('<', "&lt;")));
}

#[test]
fn nested_brackets() {
    let n = 50_000;
    let md = format!("{}a{}", "[".repeat(n), "]".repeat(n));
    let html = render_within_budget(&md);
    assert_eq!(html, format!("<p>{md}</p>\n"));
}

#[test]
fn links_inside_many_open_brackets() {
    let n = 20_000;
    let md = format!("{}{}", "[".repeat(n), "[a](/u)".repeat(n));
    let html = render_within_budget(&md);
    assert_eq!(html.matches("<a href=\"/u\">a</a>").count(), n);
}

#[test]
fn backtick_runs_of_distinct_lengths() {
    let md: String = (1..=2_000).map(|i| format!("e{}", "`".repeat(i))).collect();
    let html = render_within_budget(&md);
    assert_eq!(html, format!("<p>{md}</p>\n"));
}

#[test]
fn unclosed_html_constructs() {
    // leading text keeps the line from opening an HTML block
    for opener in ["<!--", "<?", "<![CDATA[", "<!X"] {
        let md = format!("a {}", format!("{opener} ").repeat(30_000));
        let html = render_within_budget(&md);
        assert_eq!(html, format!("<p>{}</p>\n", md.trim_end().replace('<', "&lt;")));
    }
}
