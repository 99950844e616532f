// src/utils/translate.rs

//! Spanish labels for the categories and difficulties reported by the trivia
//! API. Unknown labels pass through unchanged.

/// Translates an Open Trivia DB category name.
pub fn category<'a>(label: &'a str) -> &'a str {
    match label {
        "General Knowledge" => "Cultura general",
        "Video Games" => "Videojuegos",
        "History" => "Historia",
        "Art" => "Arte",
        "Science" => "Ciencia",
        "Geography" => "Geografía",
        "Entertainment" => "Entretenimiento",
        "Sports" => "Deportes",
        "Politics" => "Política",
        "Animals" => "Animales",
        "Vehicles" => "Vehículos",
        "Computers" => "Informática",
        other => other,
    }
}

/// Translates an Open Trivia DB difficulty.
pub fn difficulty<'a>(label: &'a str) -> &'a str {
    match label {
        "easy" => "fácil",
        "medium" => "media",
        "hard" => "difícil",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_are_translated() {
        assert_eq!(category("General Knowledge"), "Cultura general");
        assert_eq!(category("Computers"), "Informática");
        assert_eq!(difficulty("easy"), "fácil");
        assert_eq!(difficulty("hard"), "difícil");
    }

    #[test]
    fn unknown_labels_fall_back_to_original() {
        assert_eq!(category("Entertainment: Board Games"), "Entertainment: Board Games");
        assert_eq!(difficulty("extreme"), "extreme");
    }

    #[test]
    fn translated_labels_are_stable() {
        assert_eq!(difficulty(difficulty("medium")), "media");
        assert_eq!(category(category("Sports")), "Deportes");
    }
}
