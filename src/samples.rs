//! Curated quotes offered by the generator page.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleQuote {
    pub text: &'static str,
    pub author: &'static str,
}

const fn q(text: &'static str, author: &'static str) -> SampleQuote {
    SampleQuote { text, author }
}

pub const SAMPLE_QUOTES: [SampleQuote; 15] = [
    q("The future belongs to those who believe in the beauty of their dreams.", "Eleanor Roosevelt"),
    q("It is during our darkest moments that we must focus to see the light.", "Aristotle"),
    q("The way to get started is to quit talking and begin doing.", "Walt Disney"),
    q("Your limitation\u{2014}it's only your imagination.", "Unknown"),
    q("Push yourself, because no one else is going to do it for you.", "Unknown"),
    q("Great things never come from comfort zones.", "Anonymous"),
    q("Dream it. Wish it. Do it.", "Unknown"),
    q("Success doesn't just find you. You have to go out and get it.", "Unknown"),
    q("The harder you work for something, the greater you'll feel when you achieve it.", "Unknown"),
    q("Dream bigger. Do bigger.", "Unknown"),
    q("Innovation distinguishes between a leader and a follower.", "Steve Jobs"),
    q("Life is what happens to you while you're busy making other plans.", "John Lennon"),
    q("The only impossible journey is the one you never begin.", "Tony Robbins"),
    q("In the middle of difficulty lies opportunity.", "Albert Einstein"),
    q("Success is not final, failure is not fatal: it is the courage to continue that counts.", "Winston Churchill"),
];

/// Sample by index, wrapping around.
pub fn sample(index: usize) -> SampleQuote {
    SAMPLE_QUOTES[index % SAMPLE_QUOTES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_wraps() {
        assert_eq!(sample(15), SAMPLE_QUOTES[0]);
        assert_eq!(sample(6).text, "Dream it. Wish it. Do it.");
    }
}
