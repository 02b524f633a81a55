use std::collections::VecDeque;

use scraper::{Html, Selector};

use super::MenuError;

// The day's specials scraped from the Pod Koziołkiem page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KoziolekMenu {
    pub soup_of_day: String,
    pub second_soup: Option<String>,
    pub mains: Vec<String>,
}

impl KoziolekMenu {
    // Every offer the menu contributes, soups first
    pub fn offers(&self) -> Vec<String> {
        let mut offers = vec![self.soup_of_day.clone()];
        if let Some(soup) = &self.second_soup {
            offers.push(soup.clone());
        }
        offers.extend(self.mains.iter().cloned());
        offers
    }
}

// The menu lives in styled <span> blocks: a header line, the soup of the
// day (sometimes a second soup or a continuation line), then mains marked
// with leading "1." / "2." numbering.
pub fn parse_daily_specials(html: &str) -> Result<KoziolekMenu, MenuError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"span[style]"#).unwrap();

    let mut lines: VecDeque<String> = VecDeque::new();
    for span in document.select(&selector) {
        let style = span.value().attr("style").unwrap_or("");
        if !style.contains("Segoe Print") {
            continue;
        }
        for fragment in span.text() {
            let item = fragment.trim().trim_matches('\u{a0}').trim();
            if !item.is_empty() && item != ":):)" {
                lines.push_back(item.to_string());
            }
        }
    }

    // header line
    lines.pop_front().ok_or_else(|| {
        MenuError::UnexpectedPageShape("no menu lines found".to_string())
    })?;

    let mut soup_of_day = lines.pop_front().ok_or_else(|| {
        MenuError::UnexpectedPageShape("missing soup of the day".to_string())
    })?;

    let mut second_soup = None;
    while let Some(line) = lines.front() {
        if starts_numbered(line) {
            break;
        }
        let line = lines.pop_front().unwrap();
        if line.to_lowercase().contains("zupa") && second_soup.is_none() {
            second_soup = Some(line);
        } else {
            soup_of_day.push(' ');
            soup_of_day.push_str(&line);
        }
    }

    let mut mains: Vec<String> = Vec::new();
    let mut current = String::new();
    for line in lines {
        if starts_numbered(&line) && !current.is_empty() {
            mains.push(current.trim().to_string());
            current = line;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&line);
        }
    }
    if !current.is_empty() {
        mains.push(current.trim().to_string());
    }

    if mains.is_empty() {
        return Err(MenuError::UnexpectedPageShape(
            "no mains found below the soups".to_string(),
        ));
    }

    Ok(KoziolekMenu {
        soup_of_day,
        second_soup,
        mains,
    })
}

// "1.Kotlet schabowy ..." style day-menu numbering
fn starts_numbered(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_digit()) && chars.next() == Some('.')
}
