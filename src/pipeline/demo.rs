//! Sample catalog and verification items shown before anything is uploaded.

use super::types::{Novel, NovelStatus, VerificationItem};

pub fn demo_novels() -> Vec<Novel> {
    let novel = |id: &str, title: &str, author: &str, chunk_count: u32, status: NovelStatus| Novel {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        chunk_count,
        status,
    };

    vec![
        novel("1", "The Great Gatsby", "F. Scott Fitzgerald", 482, NovelStatus::Processed),
        novel("2", "Pride and Prejudice", "Jane Austen", 1250, NovelStatus::Processed),
        novel("3", "1984", "George Orwell", 890, NovelStatus::Pending),
    ]
}

pub fn demo_items() -> Vec<VerificationItem> {
    vec![
        VerificationItem::new(
            "t1",
            "The Great Gatsby",
            "Jay Gatsby",
            "Gatsby inherited all his money from his wealthy parents in the Middle West.",
            vec![
                r#""I am the son of some wealthy people in the Middle West—all dead now." "Where in the Middle West?" "San Francisco.""#.to_string(),
                "His parents were shiftless and unsuccessful farm people—his imagination had never really accepted them as his parents at all.".to_string(),
                "James Gatz—that was really, or at least legally, his name. He had changed it at the age of seventeen and at the specific moment that witnessed the beginning of his career.".to_string(),
            ],
        ),
        VerificationItem::new(
            "t2",
            "The Great Gatsby",
            "Daisy Buchanan",
            "Daisy waited faithfully for Gatsby throughout the war and never loved anyone else.",
            vec![
                "She wanted her life shaped now, immediately—and the decision must be made by some force—of love, of money, of unquestionable practicality—that was close at hand.".to_string(),
                "That force took shape in the middle of spring with the arrival of Tom Buchanan. There was a wholesome bulkiness about his person and his position, and Daisy was flattered.".to_string(),
                r#""Even alone I can't say I never loved Tom," she admitted in a pitiful voice. "It wouldn't be true.""#.to_string(),
            ],
        ),
        VerificationItem::new(
            "t3",
            "Pride and Prejudice",
            "Mr. Darcy",
            "Mr. Darcy immediately found Elizabeth Bennet to be the most beautiful woman he had ever seen upon their first meeting.",
            vec![
                r#""She is tolerable, but not handsome enough to tempt me; I am in no humour at present to give consequence to young ladies who are slighted by other men.""#.to_string(),
                "Mr. Darcy walked off; and Elizabeth remained with no very cordial feelings toward him.".to_string(),
                "He looked for a moment at Elizabeth, till catching her eye, he withdrew his own and coldly said she was tolerable.".to_string(),
            ],
        ),
    ]
}
