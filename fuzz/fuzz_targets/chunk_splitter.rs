#![no_main]

use libfuzzer_sys::fuzz_target;
use logtally::{ChunkSplitter, LineParser};

const MAX_TARGET: usize = 512;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let target = (data[0] as usize % MAX_TARGET) + 1;
    let input = &data[1..];

    let splitter = match ChunkSplitter::new(input, target) {
        Ok(s) => s,
        Err(_) => return,
    };
    let parser = match LineParser::new() {
        Ok(p) => p,
        Err(_) => return,
    };

    let mut expected_offset = 0u64;
    let mut chunk_lines = 0u64;
    for (expected_id, chunk) in splitter.enumerate() {
        let chunk = chunk.expect("in-memory reads cannot fail");
        assert_eq!(chunk.id(), expected_id as u64);
        assert_eq!(chunk.offset(), expected_offset);
        assert!(!chunk.text().is_empty());

        // Only the final chunk may lack a trailing newline
        let end = expected_offset as usize + chunk.text().len();
        if end < input.len() && !chunk.is_lossy() {
            assert!(chunk.text().ends_with('\n'));
        }
        expected_offset += chunk.text().len() as u64;
        if chunk.is_lossy() {
            // Replacement characters change the decoded length; stop tracking offsets
            return;
        }

        let tally = parser.parse_chunk(&chunk);
        assert_eq!(tally.stats.lines_read, chunk.text().lines().count() as u64);
        chunk_lines += tally.stats.lines_read;
    }

    assert_eq!(expected_offset, input.len() as u64);
    let newlines = input.iter().filter(|b| **b == b'\n').count() as u64;
    let unterminated = u64::from(!input.is_empty() && !input.ends_with(b"\n"));
    assert_eq!(chunk_lines, newlines + unterminated);
});
