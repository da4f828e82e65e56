use crate::models::chat::ChatTurn;

const EXCERPT_LEN: usize = 48;

pub fn render_transcript(turns: &[ChatTurn]) -> String {
    let mut out = String::new();
    for turn in turns {
        out.push_str(&format!("{} | {}\n{}\n\n", turn.timestamp, turn.role, turn.content));
    }
    out
}

/// `{date}_{excerpt}.txt`, derived from the first turn. The excerpt is
/// restricted to `[A-Za-z0-9_.-]` so it can never name another directory.
pub fn export_filename(first: &ChatTurn) -> String {
    let date: String = first.timestamp.chars().take(10).collect();
    let excerpt: String = first.content
        .trim()
        .chars()
        .take(EXCERPT_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' }
        })
        .collect();
    format!("{}_{}.txt", date, excerpt)
}
