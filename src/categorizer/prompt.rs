use crate::taxonomy::CategoryGenre;

/// What the model is told to answer when nothing fits. Not a valid label.
pub const UNCATEGORIZED: &str = "Uncategorized";

pub fn build_prompt(genre_name: &str) -> String {
    let labels = CategoryGenre::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a music genre expert. Your task is to categorize the given genre into one of the following categories:\n\
         {labels}\n\n\
         If the genre doesn't fit well into any category, choose the closest match or return \"{UNCATEGORIZED}\".\n\n\
         Genre to categorize: \"{genre_name}\"\n\n\
         Respond with only the category name, nothing else."
    )
}

/// Trims the model output and accepts it only if it is exactly one label.
pub fn parse_category(output: &str) -> Option<CategoryGenre> {
    CategoryGenre::from_label(output.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_label_and_the_genre() {
        let prompt = build_prompt("shoegaze");
        for category in CategoryGenre::ALL {
            assert!(prompt.contains(category.as_str()));
        }
        assert!(prompt.contains("Genre to categorize: \"shoegaze\""));
        assert!(prompt.contains("Rock, Metal, Electronic, Hip Hop and Rap"));
        assert!(prompt.ends_with("Respond with only the category name, nothing else."));
    }

    #[test]
    fn exact_labels_are_accepted_after_trimming() {
        assert_eq!(parse_category("Rock"), Some(CategoryGenre::Rock));
        assert_eq!(
            parse_category("  R&B and Soul\n"),
            Some(CategoryGenre::RnBAndSoul)
        );
    }

    #[test]
    fn anything_else_is_no_category() {
        for output in [
            UNCATEGORIZED,
            "rock",
            "Rock.",
            "Category: Rock",
            "",
            "Indie Rock",
            "Rock, Pop",
        ] {
            assert_eq!(parse_category(output), None, "{output:?}");
        }
    }
}
