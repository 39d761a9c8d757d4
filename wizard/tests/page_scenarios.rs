use std::collections::HashSet;

use wizard::{
    aggregate_colors, analyze,
    page::xhtml::{load_page, write_page},
    ComputedStyle, ContentSession, HighlightState, Page, PageMut, Response, StaticPage,
};

const STOREFRONT: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Storefront</title></head>
<body style="background-color: rgb(250, 250, 250); color: rgb(33, 33, 33); font-family: Inter, sans-serif">
  <header style="background-color: rgb(10, 10, 10); color: white">
    <h1 style="font-family: 'Playfair Display', serif; font-weight: 700">Shop</h1>
    <nav><a style="color: rgb(255, 200, 0)">Sale</a> <a>New</a></nav>
  </header>
  <main>
    <p>First paragraph</p>
    <p style="border: 2px solid rgb(10, 10, 10)">Boxed paragraph</p>
    <button style="background-color: rgb(255, 200, 0); color: rgb(10, 10, 10); outline: none">Buy</button>
    <pre style="font-family: &quot;Fira Code&quot;, monospace; font-size: 14px">cargo run</pre>
  </main>
  <div style="display: none; background-color: rgb(1, 1, 1)">Hidden banner</div>
  <footer style="color: rgba(33, 33, 33, 0.6)">Copyright</footer>
</body>
</html>"#;

fn storefront() -> StaticPage {
    load_page(STOREFRONT.as_bytes(), "https://shop.example/").unwrap()
}

fn inline_styles(page: &StaticPage) -> Vec<String> {
    let root = page.root();
    page.subtree(&root)
        .unwrap()
        .into_iter()
        .map(|node| page.inline(node).to_string())
        .collect()
}

#[test]
fn div_and_span_share_one_entry() {
    let mut page = StaticPage::new("https://example.test/", "Scenario");
    let root = page.root();
    let body = page.append_element(root, "body", ComputedStyle::default());
    page.append_element(
        body,
        "div",
        ComputedStyle::default().with_background("rgb(10, 10, 10)"),
    );
    let span = page.append_element(
        body,
        "span",
        ComputedStyle::default().with_color("rgb(10, 10, 10)"),
    );
    page.append_text(span, "text");

    let colors = aggregate_colors(&page, &root).unwrap();
    assert_eq!(colors.len(), 1);
    assert_eq!(colors[0].color, "rgb(10, 10, 10)");
    assert_eq!(colors[0].count, 2);
    assert_eq!(colors[0].elements, vec!["div", "span"]);
}

#[test]
fn storefront_palette() {
    let page = storefront();
    let report = analyze(&page).unwrap();
    assert_eq!(report.title, "Storefront");
    assert_eq!(report.url, "https://shop.example/");

    let unique = report
        .colors
        .iter()
        .map(|entry| entry.color.as_str())
        .collect::<HashSet<_>>();
    assert_eq!(unique.len(), report.colors.len());

    // inherited body text color, counted once per tag
    let body_text = report
        .colors
        .iter()
        .find(|entry| entry.color == "rgb(33, 33, 33)")
        .unwrap();
    assert_eq!(body_text.elements, vec!["body", "main", "p", "pre"]);

    // hidden banner never counts
    assert!(report.colors.iter().all(|entry| entry.color != "rgb(1, 1, 1)"));
    // partially transparent text is still a color
    assert!(report
        .colors
        .iter()
        .any(|entry| entry.color == "rgba(33, 33, 33, 0.6)"));

    let dark = report
        .colors
        .iter()
        .find(|entry| entry.color == "rgb(10, 10, 10)")
        .unwrap();
    assert_eq!(dark.count, 3);
    assert_eq!(dark.elements, vec!["header", "p", "button"]);

    let counts = report.colors.iter().map(|entry| entry.count).collect::<Vec<_>>();
    let mut sorted = counts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
}

#[test]
fn storefront_typography() {
    let page = storefront();
    let report = analyze(&page).unwrap();

    let names = report
        .fonts
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names[0], "Inter");
    assert!(names.contains(&"Playfair Display"));
    assert!(names.contains(&"Fira Code"));

    let code = report.fonts.iter().find(|entry| entry.name == "Fira Code").unwrap();
    assert_eq!(code.sizes, vec!["14px"]);
    assert_eq!(code.elements, vec!["pre"]);

    let total = report.fonts.iter().map(|entry| entry.count).sum::<usize>();
    let body = page.body().unwrap().unwrap();
    let text_bearing = page
        .subtree(&body)
        .unwrap()
        .into_iter()
        .filter(|node| !page.text_content(node).trim().is_empty())
        .count();
    assert_eq!(total, text_bearing);

    let share = report
        .fonts
        .iter()
        .map(|entry| entry.usage_percent.trim_end_matches('%').parse::<f64>().unwrap())
        .sum::<f64>();
    assert!((share - 100.0).abs() <= 0.1 * report.fonts.len() as f64);
}

#[test]
fn highlight_round_trip_through_messages() {
    let page = storefront();
    let before = inline_styles(&page);
    let mut session = ContentSession::new(page);

    let reply = session
        .handle_json(r#"{"action":"highlightColor","color":"rgb(10, 10, 10)"}"#)
        .unwrap();
    assert_eq!(reply, None);
    assert_eq!(session.highlighted_count(), 3);
    assert_ne!(inline_styles(session.page()), before);

    let scrolled = session.page().scroll_log()[0].0;
    assert_eq!(session.page().tag_name(&scrolled), "header");

    session
        .handle_json(r#"{"action":"removeHighlight"}"#)
        .unwrap();
    assert_eq!(session.state(), &HighlightState::Idle);
    assert_eq!(inline_styles(session.page()), before);
    assert!(session.page().marked_nodes().is_empty());
}

#[test]
fn highlighted_snapshot_survives_a_write() {
    let page = storefront();
    let mut session = ContentSession::new(page);
    session
        .handle_json(r#"{"action":"highlightFont","font":"Fira Code","highlightColor":"lime"}"#)
        .unwrap();

    let page = session.into_page();
    let mut out = Vec::new();
    write_page(&page, &mut out).unwrap();
    let written = String::from_utf8(out).unwrap();
    assert!(written.contains("data-highlighted=\"true\""));
    assert!(written.contains("outline: 3px solid lime !important;"));

    // a reloaded page with leftover markers is cleaned up by the next removal
    let reloaded = load_page(written.as_bytes(), "https://shop.example/").unwrap();
    assert_eq!(reloaded.marked_nodes().len(), 1);
    let mut session = ContentSession::new(reloaded);
    session.handle_json(r#"{"action":"removeHighlight"}"#).unwrap();
    assert!(session.page().marked_nodes().is_empty());
}

#[test]
fn analyze_reply_is_json_report() {
    let mut session = ContentSession::new(storefront());
    let reply = session.handle_json(r#"{"action":"analyze"}"#).unwrap().unwrap();
    let response: Response = serde_json::from_str(&reply).unwrap();
    match response {
        Response::Report(report) => assert_eq!(report.title, "Storefront"),
        Response::Failure { error } => panic!("unexpected failure: {}", error),
    }
}
