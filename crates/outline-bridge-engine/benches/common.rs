// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_chat_message(size: usize) -> String {
    let base = "## Summary\n\nSee [[Project Plan]] and ((abc123xyz)) for **context**, or https://example.com/docs.\n\n- First point with *emphasis*\n  - [ ] follow up #todo\n- Second point with ==highlight==\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n| Name | Count |\n| :--- | ---: |\n| apples | 3 |\n| pears | 5 |\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_list(items: usize, depth: usize) -> String {
    let mut content = String::new();

    for item in 0..items {
        for level in 0..depth {
            let indent = "  ".repeat(level);
            content.push_str(&format!(
                "{indent}- Item {item} at level {level} with `code` and [a link](https://example.com/{item})\n"
            ));
        }
    }

    content
}

#[allow(dead_code)]
pub fn generate_hostile_html_message(size: usize) -> String {
    let base = "Hello <script>alert(1)</script> <img src=x onerror=alert(1)> [x](javascript:alert(1)) <!-- c -->\n\n";
    base.repeat(size)
}
