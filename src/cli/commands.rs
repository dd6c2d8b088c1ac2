use crate::{Error, Result};
use reqwest::Client;
use serde::Deserialize;

/// Search options forwarded to the server's search endpoint
#[derive(Debug, Default)]
pub struct SearchOptions {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Search for recipes via a running server
pub async fn search(server_url: &str, query: &str, options: &SearchOptions) -> Result<()> {
    let client = Client::new();

    // Build query params
    let mut url = format!("{}/api/search?q={}", server_url, urlencoding::encode(query));

    if let Some(category) = &options.category {
        url.push_str(&format!("&category={}", urlencoding::encode(category)));
    }
    if let Some(sort) = &options.sort {
        url.push_str(&format!("&sort={}", urlencoding::encode(sort)));
    }
    if let Some(page) = options.page {
        url.push_str(&format!("&page={page}"));
    }
    if let Some(limit) = options.limit {
        url.push_str(&format!("&limit={limit}"));
    }

    // Make request
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(Error::Http(response.error_for_status().unwrap_err()));
    }

    let search_results: SearchResponse = response.json().await?;

    print_search_results(&search_results);

    Ok(())
}

fn print_search_results(results: &SearchResponse) {
    let data = &results.data;

    if data.recipes.is_empty() {
        println!("No recipes found");
    } else {
        println!("\nFound {} recipes:\n", data.pagination.total);
        println!("{:<5} {:<44} {:>6} {:<18}", "ID", "Title", "Score", "Cuisine");
        println!("{}", "-".repeat(75));

        for recipe in &data.recipes {
            println!(
                "{:<5} {:<44} {:>6} {:<18}",
                recipe.id,
                truncate(&recipe.title, 42),
                recipe.relevance_score,
                truncate(recipe.cuisine.as_deref().unwrap_or("-"), 16)
            );
        }

        println!(
            "\nPage {} of {}",
            data.pagination.page, data.pagination.total_pages
        );
    }

    if !data.suggestions.is_empty() {
        let hints: Vec<&str> = data
            .suggestions
            .iter()
            .map(|s| s.suggestion.as_str())
            .collect();
        println!("\nRelated: {}", hints.join(", "));
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

// Response types (matching API models)

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: SearchData,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    recipes: Vec<RecipeCard>,
    pagination: Pagination,
    suggestions: Vec<SuggestionHint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeCard {
    id: i64,
    title: String,
    cuisine: Option<String>,
    relevance_score: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page: usize,
    total: usize,
    total_pages: usize,
}

#[derive(Debug, Deserialize)]
struct SuggestionHint {
    suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long recipe title", 10), "a very ...");
    }

    #[test]
    fn test_truncate_cuts_on_char_boundaries() {
        // Multi-byte titles must not split a character mid-sequence
        assert_eq!(truncate("crème brûlée à l'ancienne", 10), "crème b...");
        assert_eq!(truncate("日本のラーメンの作り方入門", 10), "日本のラーメン...");
    }
}
