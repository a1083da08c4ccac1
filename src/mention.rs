//! Mention token handling.

use std::sync::LazyLock;

use regex::Regex;

/// Matches user mentions: `<@123>` and the nickname form `<@!123>`.
static MENTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?\d+>").expect("mention pattern is valid"));

/// Strips every user mention token from `content` and trims the rest.
///
/// Removal repeats until no token is left, so input like `<@<@1>2>` cannot
/// leave a token behind. The result is empty when the message held nothing
/// but mentions.
#[must_use]
pub fn extract_query(content: &str) -> String {
    let mut text = content.to_string();
    while MENTION_TOKEN.is_match(&text) {
        text = MENTION_TOKEN.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_mention() {
        assert_eq!(
            extract_query("<@123456> what is the weather"),
            "what is the weather"
        );
    }

    #[test]
    fn strips_every_mention() {
        assert_eq!(
            extract_query("<@1> hello <@!22> and <@333>"),
            "hello  and"
        );
    }

    #[test]
    fn mention_only_yields_empty() {
        assert_eq!(extract_query("  <@999>  "), "");
    }

    #[test]
    fn leaves_other_tokens_alone() {
        assert_eq!(
            extract_query("<@999> ping <#42> <@&7> <@abc>"),
            "ping <#42> <@&7> <@abc>"
        );
    }

    #[test]
    fn tokens_formed_by_removal_are_stripped() {
        assert_eq!(extract_query("<@<@1>2> nested"), "nested");
        assert!(!MENTION_TOKEN.is_match(&extract_query("<@<@!<@3>4>5>x")));
    }

    #[test]
    fn extraction_is_idempotent() {
        let inputs = [
            "<@999> ping",
            "<@<@1>2> nested",
            "no mentions here",
            "<@1><@2><@3>",
            "   spaced <@!5> out   ",
        ];
        for input in inputs {
            let once = extract_query(input);
            assert_eq!(extract_query(&once), once, "input: {input}");
        }
    }
}
