use outline_bridge_engine::{from_outline_format, to_outline_format};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

#[test]
fn fixture_release_notes_to_outline() {
    let outline = to_outline_format(&fixture("release_notes"));
    insta::assert_snapshot!(outline, @r"
    - # Release
      - Ship **today** with [[Launch]].
      - {{[[TODO]]}} tag the build
        - run `cargo publish`
      - {{[[DONE]]}} write notes
      - {{[[table]]}}
        - **Step**
          - **Owner**
        - deploy
          - ops
    ");
}

#[test]
fn fixture_release_notes_back_to_markdown() {
    let markdown = from_outline_format(&to_outline_format(&fixture("release_notes")));
    insta::assert_snapshot!(markdown, @r"
    # Release

    - Ship **today** with [[Launch]].
    - [ ] tag the build
      - run `cargo publish`
    - [x] write notes

    | Step | Owner |
    | --- | --- |
    | deploy | ops |
    ");
}
