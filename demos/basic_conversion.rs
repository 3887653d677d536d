//! Basic conversion example demonstrating the layout planner
//!
//! Run with `RUST_LOG=debug` to see skipped nodes, placeholder images and
//! table placement warnings.

use html_layout_planner::config::{ConversionOptions, Unit};
use html_layout_planner::converter::LayoutConverter;
use html_layout_planner::style::TextStyle;

fn main() {
    env_logger::init();

    println!("=== HTML Layout Planner - Basic Examples ===\n");

    // Example 1: Headings and styled text
    example_1();

    // Example 2: Table with spans
    example_2();

    // Example 3: Nested lists with custom padding
    example_3();

    // Example 4: Images with and without a resolver hit
    example_4();
}

fn print_plan(title: &str, html: &str, converter: &LayoutConverter) {
    println!("{}", title);
    println!("Input HTML:");
    println!("{}\n", html);

    let plan = converter.convert_html(html);
    match serde_json::to_string_pretty(&plan) {
        Ok(json) => {
            println!("Layout plan:");
            println!("{}", json);
        }
        Err(e) => eprintln!("Failed to serialize plan: {}", e),
    }
    println!("---\n");
}

fn example_1() {
    let html = r#"<h1>Welcome</h1><p>This is <b>bold</b> and <span style="color:#c00">red</span>.</p>"#;
    print_plan(
        "Example 1: Headings and styled text",
        html,
        &LayoutConverter::default(),
    );
}

fn example_2() {
    let html = r#"<table border="1" cellpadding="4">
  <tr><th colspan="2">Quarter</th></tr>
  <tr><td rowspan="2">Q1</td><td>Jan</td></tr>
  <tr><td>Feb</td></tr>
</table>"#;
    print_plan("Example 2: Table with spans", html, &LayoutConverter::default());
}

fn example_3() {
    let html = "<ol><li>Prepare<ul><li>Gather</li><li>Sort</li></ul></li><li>Ship</li></ol>";
    let options = match ConversionOptions::default().with_list_vertical_padding(0.25, Unit::Inch)
    {
        Ok(options) => options.with_text_style("li", TextStyle::new().size(11.0)),
        Err(e) => {
            eprintln!("Invalid options: {}", e);
            return;
        }
    };
    print_plan(
        "Example 3: Nested lists with custom padding",
        html,
        &LayoutConverter::new(options),
    );
}

fn example_4() {
    let html = r#"<div><img src="logo.png" width="120"></div><p>Missing: <img src="gone.png"></p>"#;
    let options = ConversionOptions::default().with_image_resolver(|src| {
        (src == "logo.png").then(|| vec![0x89, b'P', b'N', b'G'])
    });
    print_plan(
        "Example 4: Images with and without a resolver hit",
        html,
        &LayoutConverter::new(options),
    );
}
