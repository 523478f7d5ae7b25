//! Comma-joined tabular rendering.
//!
//! Fields are written as-is with no quoting, so commas or newlines inside
//! an author or message cannot be told apart from separators on re-read.

use crate::models::Commit;

/// One `hash,author_name,date,message` line per commit, joined by `\n`
/// with no header and no trailing newline.
pub fn render(commits: &[Commit]) -> Vec<u8> {
    commits
        .iter()
        .map(|c| format!("{},{},{},{}", c.hash, c.author_name, c.date, c.message))
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::history::parse_log;

    #[test]
    fn one_line_per_commit_in_input_order() {
        let commits = parse_log(
            "a1|Alice|2024-01-02|fix bug\n\
             a2|Bob|2024-01-05|a|b|c\n",
        );
        let csv = String::from_utf8(render(&commits)).unwrap();
        assert_eq!(csv, "a1,Alice,2024-01-02,fix bug\na2,Bob,2024-01-05,a|b|c");
    }

    #[test]
    fn leading_fields_survive_a_round_trip() {
        let raw = "f00d|Dana Scully|Mon Jan 1 00:00:00 2024 +0000|Merge, then fix, then test\n\
                   beef|Fox|Tue Jan 2 00:00:00 2024 +0000|plain\n";
        let commits = parse_log(raw);
        let csv = String::from_utf8(render(&commits)).unwrap();

        for (line, commit) in csv.lines().zip(&commits) {
            let fields: Vec<_> = line.split(',').collect();
            assert_eq!(fields[0], commit.hash);
            assert_eq!(fields[1], commit.author_name);
            assert_eq!(fields[2], commit.date);
        }
        // Messages with commas split into extra columns.
        assert_eq!(csv.lines().next().unwrap().split(',').count(), 6);
    }

    #[test]
    fn single_commit_has_no_trailing_newline() {
        let commits = parse_log("a1|Alice|2024-01-02|fix bug");
        assert_eq!(render(&commits), b"a1,Alice,2024-01-02,fix bug");
    }
}
