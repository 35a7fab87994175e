//! Text helpers used by recipe value generators

const OHMS: &str = "ohms";
const OHM_SYMBOL: char = 'Ω';

/// Rewrite `Ohms`, `kOhms`, `MOhms` and `mOhms` to `Ω`, `kΩ`, `MΩ` and `mΩ`
///
/// The word `ohms` is matched case-insensitively. The multiplier letter keeps
/// its case (`M` mega, `m` milli) except `K`, which is normalized to `k`.
/// Whitespace in front of the unit is removed. Text that has already been
/// converted contains no `ohms` and is returned unchanged.
pub fn format_resistance(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let chars: Vec<char> = text.trim().chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if is_ohms_at(&chars, i) {
            let multiplier = match out.chars().last() {
                Some('M') => Some('M'),
                Some('m') => Some('m'),
                Some('k') | Some('K') => Some('k'),
                _ => None,
            };
            if multiplier.is_some() {
                out.pop();
            }
            let trimmed_len = out.trim_end().len();
            out.truncate(trimmed_len);
            if let Some(m) = multiplier {
                out.push(m);
            }
            out.push(OHM_SYMBOL);
            i += OHMS.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

/// `ohms` (any case) at `i`, followed by a word boundary
fn is_ohms_at(chars: &[char], i: usize) -> bool {
    let end = i + OHMS.len();
    if end > chars.len() {
        return false;
    }
    let matches = chars[i..end]
        .iter()
        .zip(OHMS.chars())
        .all(|(c, o)| c.to_ascii_lowercase() == o);
    let boundary = chars
        .get(end)
        .map_or(true, |c| !(c.is_alphanumeric() || *c == '_'));
    matches && boundary
}

/// Join present, non-empty parts with `", "` after removing their spaces
pub fn compact_join<I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    parts
        .into_iter()
        .flatten()
        .map(|p| p.replace(' ', ""))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text before the first part of a comma-separated list
pub fn first_listed(text: &str) -> &str {
    text.split_once(',').map_or(text, |(head, _)| head)
}

const CASE_TEMPERATURE_TAG: &str = "(Tc)";

/// First `<digits>mA` figure tagged with `(Tc)`
///
/// `"100mA (Ta), 1.1A (Tc)"` has no tagged milliamp figure; `"500mA (Tc)"`
/// yields `"500mA"`.
pub fn case_rated_current(text: &str) -> Option<String> {
    tagged_heads(text)
        .find_map(|head| figure_with_unit(head, "mA", false))
        .map(str::to_string)
}

/// First `<number>W` or `<number>mW` figure tagged with `(Tc)`
pub fn case_rated_power(text: &str) -> Option<String> {
    tagged_heads(text)
        .find_map(|head| {
            figure_with_unit(head, "mW", true).or_else(|| figure_with_unit(head, "W", true))
        })
        .map(str::to_string)
}

/// Text preceding each `(Tc)` tag, trailing whitespace removed
fn tagged_heads(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices(CASE_TEMPERATURE_TAG)
        .map(move |(at, _)| text[..at].trim_end())
}

/// Trailing `<number><unit>` of `head`
fn figure_with_unit<'a>(head: &'a str, unit: &str, allow_decimal: bool) -> Option<&'a str> {
    let number = head.strip_suffix(unit)?;
    let rest = number.trim_end_matches(|c: char| c.is_ascii_digit() || (allow_decimal && c == '.'));
    if rest.len() == number.len() {
        return None;
    }
    Some(&head[rest.len()..])
}
