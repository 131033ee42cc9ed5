//! English noun inflection and identifier casing used to canonicalize
//! entity names.

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
];

// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("cache", "caches"),
    ("child", "children"),
    ("cookie", "cookies"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("hero", "heroes"),
    ("index", "indices"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("loaf", "loaves"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("movie", "movies"),
    ("ox", "oxen"),
    ("person", "people"),
    ("potato", "potatoes"),
    ("quiz", "quizzes"),
    ("shelf", "shelves"),
    ("thief", "thieves"),
    ("tooth", "teeth"),
    ("vertex", "vertices"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Singularize a single lowercase English noun.
pub fn singularize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *p == word || *s == word) {
        return singular.to_string();
    }

    if word.len() > 3 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }

    if word.ends_with("sses") || word.ends_with("shes") || word.ends_with("ches") {
        return word[..word.len() - 2].to_string();
    }

    if word.ends_with("xes") || word.ends_with("zzes") {
        return word[..word.len() - 2].to_string();
    }

    if let Some(stem) = word.strip_suffix("uses") {
        // houses -> house, statuses -> status
        return match stem.chars().last() {
            Some(c) if is_vowel(c) => format!("{}use", stem),
            _ => format!("{}us", stem),
        };
    }

    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Pluralize a single lowercase English noun.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return plural.to_string();
    }

    let mut chars = word.chars().rev();
    let last = chars.next();
    let before_last = chars.next();

    match (before_last, last) {
        (Some(prev), Some('y')) if !is_vowel(prev) => format!("{}ies", &word[..word.len() - 1]),
        _ if word.ends_with('s')
            || word.ends_with("sh")
            || word.ends_with("ch")
            || word.ends_with('x')
            || word.ends_with('z') =>
        {
            format!("{}es", word)
        }
        _ => format!("{}s", word),
    }
}

/// Convert `OrderItem`, `orderItem`, `order-item` or `order item` into `order_item`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.trim().chars().collect();
    let mut result = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }

        result.extend(c.to_lowercase());
    }

    result.trim_end_matches('_').to_string()
}

pub fn to_pascal_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Canonical entity identifier: snake_case with the trailing word singularized.
///
/// `"Order Items"` becomes `order_item`, `"People"` becomes `person`.
pub fn canonical_entity_name(raw: &str) -> String {
    let snake = to_snake_case(raw);
    match snake.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, singularize(last)),
        None => singularize(&snake),
    }
}
