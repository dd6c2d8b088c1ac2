use spicerack::db::models::{NewRecipe, RecipeIngredient};
use spicerack::db::{ingredients, recipes, tags, DbPool};
use spicerack::search::{self, SuggestionKind};
use sqlx::SqlitePool;

async fn test_pool() -> DbPool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn seed_recipe(
    pool: &DbPool,
    title: &str,
    description: Option<&str>,
    cuisine: Option<&str>,
    ingredient_names: &[&str],
    average_rating: Option<f64>,
) -> i64 {
    let recipe = recipes::create_recipe(
        pool,
        &NewRecipe {
            user_id: None,
            title: title.to_string(),
            description: description.map(|d| d.to_string()),
            image: None,
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
            difficulty: None,
            cuisine: cuisine.map(|c| c.to_string()),
            category: None,
            average_rating,
            likes_count: 0,
        },
    )
    .await
    .expect("Failed to create recipe");

    let lines: Vec<RecipeIngredient> = ingredient_names
        .iter()
        .map(|name| RecipeIngredient {
            name: name.to_string(),
            quantity: None,
            unit: None,
        })
        .collect();
    ingredients::set_recipe_ingredients(pool, recipe.id, &lines)
        .await
        .expect("Failed to set ingredients");

    recipe.id
}

#[tokio::test]
async fn test_short_queries_return_empty_without_store_access() {
    // No migrations on purpose: any store access would error
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

    for query in ["", "a", " a ", "   ", "\t\n"] {
        let results = search::instant_search(&pool, query, 6).await.unwrap();
        assert!(results.recipes.is_empty(), "query {query:?}");
        assert!(results.suggestions.is_empty(), "query {query:?}");
    }
}

#[tokio::test]
async fn test_two_character_query_searches() {
    let pool = test_pool().await;
    seed_recipe(&pool, "Ox Tail Soup", None, None, &[], None).await;

    let results = search::instant_search(&pool, "ox", 6).await.unwrap();
    assert_eq!(results.recipes.len(), 1);
}

#[tokio::test]
async fn test_result_cap_and_no_pagination() {
    let pool = test_pool().await;

    for i in 1..=9 {
        seed_recipe(&pool, &format!("Dumpling Batch {i}"), None, None, &[], None).await;
    }

    let results = search::instant_search(&pool, "dumpling", 6).await.unwrap();
    assert_eq!(results.recipes.len(), 6);

    let results = search::instant_search(&pool, "dumpling", 3).await.unwrap();
    assert_eq!(results.recipes.len(), 3);
}

#[tokio::test]
async fn test_instant_weighting_prefers_cuisine_over_description() {
    let pool = test_pool().await;

    seed_recipe(&pool, "Green Papaya Salad", None, Some("Thai"), &[], None).await;
    seed_recipe(
        &pool,
        "Mild Noodles",
        Some("inspired by thai flavors"),
        None,
        &[],
        None,
    )
    .await;

    let results = search::instant_search(&pool, "thai", 6).await.unwrap();
    assert_eq!(results.recipes.len(), 2);
    assert_eq!(results.recipes[0].title, "Green Papaya Salad");
    assert_eq!(results.recipes[0].relevance_score, 8);
    assert_eq!(results.recipes[1].relevance_score, 2);
}

#[tokio::test]
async fn test_score_ties_break_by_rating() {
    let pool = test_pool().await;

    seed_recipe(&pool, "Miso Soup", None, None, &[], Some(3.5)).await;
    seed_recipe(&pool, "Miso Glaze", None, None, &[], Some(4.8)).await;
    seed_recipe(&pool, "Miso Butter", None, None, &[], None).await;

    let results = search::instant_search(&pool, "miso", 6).await.unwrap();
    let titles: Vec<&str> = results.recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Miso Glaze", "Miso Soup", "Miso Butter"]);
}

#[tokio::test]
async fn test_matched_ingredients_are_the_matching_subsequence() {
    let pool = test_pool().await;

    seed_recipe(
        &pool,
        "Peanut Noodles",
        None,
        None,
        &["peanut butter", "noodles", "peanut oil"],
        None,
    )
    .await;

    let results = search::instant_search(&pool, "peanut", 6).await.unwrap();
    assert_eq!(results.recipes.len(), 1);

    let matched = results.recipes[0].matched_ingredients.as_ref().unwrap();
    let names: Vec<&str> = matched.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["peanut butter", "peanut oil"]);
}

#[tokio::test]
async fn test_suggestions_capped_at_six_with_cuisines_first() {
    let pool = test_pool().await;

    // "an" matches several catalogue cuisines plus seeded tags and
    // ingredients in every category
    let id = seed_recipe(
        &pool,
        "Anchovy Toast",
        None,
        None,
        &["anchovy", "pancetta", "parmesan"],
        None,
    )
    .await;
    tags::set_recipe_tags(
        &pool,
        id,
        &[
            "antipasto".to_string(),
            "pantry".to_string(),
            "weeknight-dinner".to_string(),
        ],
    )
    .await
    .unwrap();

    let results = search::instant_search(&pool, "an", 6).await.unwrap();

    assert!(results.suggestions.len() <= 6);
    assert_eq!(results.suggestions[0].kind, SuggestionKind::Cuisine);
    for kind in [
        SuggestionKind::Cuisine,
        SuggestionKind::Tag,
        SuggestionKind::Ingredient,
    ] {
        let count = results
            .suggestions
            .iter()
            .filter(|s| s.kind == kind)
            .count();
        assert!(count <= 3, "{kind:?} over cap");
    }
}

#[tokio::test]
async fn test_unescaped_special_characters_match_literally() {
    let pool = test_pool().await;

    seed_recipe(&pool, "Weird Pie", None, None, &["coco(nut"], None).await;
    seed_recipe(&pool, "Coconut Pie", None, None, &["coconut"], None).await;

    // Must not raise a pattern error, and must match only the literal text
    let results = search::instant_search(&pool, "coco(nut", 6).await.unwrap();
    assert_eq!(results.recipes.len(), 1);
    assert_eq!(results.recipes[0].title, "Weird Pie");

    let results = search::instant_search(&pool, "a.b*c", 6).await.unwrap();
    assert!(results.recipes.is_empty());
}
