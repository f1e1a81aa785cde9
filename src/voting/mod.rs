pub mod bar;

use crate::models::Poll;
use bar::draw_bar;

/// Renders the poll title followed by one bar line per option.
pub fn format_poll(poll: &Poll) -> String {
    let total_votes = poll.total_votes();

    let mut result = format!("{}\n", poll.title);
    for (i, option) in poll.options.iter().enumerate() {
        result.push_str(&format!(
            "{} {}. {} ({} votes)\n",
            draw_bar(option.votes, total_votes),
            i + 1,
            option.text,
            option.votes
        ));
    }

    result.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_options_is_title_only() {
        let poll = Poll::new("Lunch");
        assert_eq!(format_poll(&poll), "Lunch");
    }

    #[test]
    fn test_format_lists_options_in_insertion_order() {
        let mut poll = Poll::new("Lunch");
        poll.add_option("Pizza");
        poll.add_option("Tacos");
        poll.add_option("Sushi");
        poll.options[0].votes = 2;
        poll.options[2].votes = 1;

        let expected = "Lunch\n\
            [==========-----] 1. Pizza (2 votes)\n\
            [---------------] 2. Tacos (0 votes)\n\
            [=====----------] 3. Sushi (1 votes)";
        assert_eq!(format_poll(&poll), expected);
    }
}
