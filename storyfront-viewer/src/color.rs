use crate::story::UNCATEGORIZED;

/// Badge color for posts without a category.
pub const NEUTRAL: &str = "#9ca3af";

fn fold(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            c => c,
        })
        .collect()
}

fn known(key: &str) -> Option<&'static str> {
    Some(match key {
        "brasil" => "#2563eb",
        "cidade" => "#2563eb",
        "cultura" => "#8b5cf6",
        "educacao" => "#e11d48",
        "esportes" => "#f59e0b",
        "marilia" => "#dc2626",
        "mundo" => "#0ea5e9",
        "regiao" => "#ea580c",
        "saude" => "#16a34a",
        _ => return None,
    })
}

fn hashed(name: &str) -> String {
    let hash = name
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32));

    format!(
        "#{:02x}{:02x}{:02x}",
        hash & 0xff,
        (hash >> 8) & 0xff,
        (hash >> 16) & 0xff
    )
}

/// Hex color for a category badge, looked up by slug then name.
pub fn category_color(name: &str, slug: Option<&str>) -> String {
    let key = fold(slug.filter(|slug| !slug.is_empty()).unwrap_or(name));

    if key.is_empty() || (slug.is_none() && name == UNCATEGORIZED) {
        return NEUTRAL.to_string();
    }

    known(&key)
        .map(str::to_string)
        .or_else(|| known(&fold(name)).map(str::to_string))
        .unwrap_or_else(|| hashed(name))
}
