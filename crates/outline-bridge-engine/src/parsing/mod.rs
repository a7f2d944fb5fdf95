pub mod blocks;
pub mod inline;
pub mod outline;
pub mod table;

use blocks::{Block, BlockBuilder, MarkdownLineClassifier};

/// Parses vault-protected markdown into blocks.
pub fn parse_document(text: &str) -> Vec<Block> {
    let classifier = MarkdownLineClassifier;
    let mut builder = BlockBuilder::new();

    for line in text.lines() {
        let lc = classifier.classify(line);
        builder.push(&lc);
    }

    builder.finish()
}
