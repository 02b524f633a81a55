use std::collections::VecDeque;

use scraper::{Html, Selector};

use super::MenuError;

const SOUP_MARKER: &str = "ZUPA DNIA:";
const MAIN_MARKER: &str = "DANIE DNIA:";

// One weekday's section of the Tomas menu
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TomasDay {
    pub soups: Vec<String>,
    pub mains: Vec<String>,
}

impl TomasDay {
    // Every soup + main pairing offered that day
    pub fn combos(&self) -> Vec<String> {
        let mut combos = Vec::new();
        for soup in &self.soups {
            for main in &self.mains {
                combos.push(format!("{} + {}", soup, main));
            }
        }
        combos
    }
}

// The whole week scraped from the Tomas page: diet rows first, then five
// weekday sections (Monday..Friday)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomasMenu {
    pub diet: Vec<String>,
    pub days: Vec<TomasDay>,
}

// The menu is a table of <td class="biala"> cells. Diet meals lead (every
// entry carries a "kcal" figure), then each weekday repeats a
// "ZUPA DNIA:" soups line and "DANIE DNIA:" mains until the next day.
pub fn parse_weekly_menu(html: &str) -> Result<TomasMenu, MenuError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"td.biala"#).unwrap();

    let mut lines: VecDeque<String> = VecDeque::new();
    for cell in document.select(&selector) {
        for fragment in cell.text() {
            let item = fragment
                .replace('\n', "")
                .replace('\t', "")
                .trim()
                .trim_matches('\u{a0}')
                .trim()
                .to_string();
            if !item.is_empty() && item != ":):)" {
                lines.push_back(item);
            }
        }
    }

    if lines.is_empty() {
        return Err(MenuError::UnexpectedPageShape(
            "no menu cells found".to_string(),
        ));
    }

    // diet meals: each entry starts at a kcal line and runs until the next
    // kcal line or the first weekday section
    let mut diet: Vec<String> = Vec::new();
    while lines.iter().any(|line| line.contains("kcal")) {
        let mut meal = match lines.pop_front() {
            Some(line) => line,
            None => break,
        };
        while let Some(next) = lines.front() {
            if next.contains("kcal") || next == SOUP_MARKER {
                break;
            }
            meal.push(' ');
            meal.push_str(&lines.pop_front().unwrap());
        }
        diet.push(meal);
    }

    let mut days: Vec<TomasDay> = Vec::new();
    for _ in 0..5 {
        if lines.front().map(|l| l == SOUP_MARKER).unwrap_or(false) {
            lines.pop_front();
        }

        let soups_line = lines.pop_front().ok_or_else(|| {
            MenuError::UnexpectedPageShape("weekday section missing its soups".to_string())
        })?;
        let soups: Vec<String> = soups_line
            .split(',')
            .map(|soup| soup.trim().trim_end_matches('.').to_string())
            .filter(|soup| !soup.is_empty())
            .collect();

        if lines.front().map(|l| l == MAIN_MARKER).unwrap_or(false) {
            lines.pop_front();
        }

        let mut mains: Vec<String> = Vec::new();
        while let Some(next) = lines.front() {
            if next == SOUP_MARKER {
                break;
            }
            mains.push(lines.pop_front().unwrap());
        }

        if mains.is_empty() {
            return Err(MenuError::UnexpectedPageShape(
                "weekday section missing its mains".to_string(),
            ));
        }

        days.push(TomasDay { soups, mains });

        if lines.is_empty() {
            break;
        }
    }

    if days.len() < 5 {
        return Err(MenuError::UnexpectedPageShape(format!(
            "expected 5 weekday sections, found {}",
            days.len()
        )));
    }

    Ok(TomasMenu { diet, days })
}
