//! Tour catalog: the category and trending-state fold over loaded tour plans.
//!
//! Pure and side-effect free. Callers load and join the plans first.

use wayfarer_core::models::{
    CategoryGroup, StateBucket, TourCatalog, TourCategory, TourPlanView, TrendingState,
};

fn min_price(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Starting price of one plan: the address price when positive, else the plan's base fare.
fn plan_price(view: &TourPlanView) -> Option<f64> {
    let address_price = view
        .address_details
        .as_ref()
        .and_then(|a| a.starting_price)
        .filter(|p| *p > 0.0);
    address_price.or(view.plan.base_fare)
}

/// First category whose theme the plan carries, in `TourCategory::ORDERED` order.
/// A plan flagged `itTop` always counts as a top destination.
pub fn categorize(view: &TourPlanView) -> Option<TourCategory> {
    let names: Vec<String> = view.themes.iter().map(|t| t.name.to_lowercase()).collect();
    TourCategory::ORDERED.into_iter().find(|category| {
        (*category == TourCategory::TopDestinations && view.plan.it_top.is_set())
            || names.iter().any(|n| n == category.theme_name())
    })
}

pub fn build_catalog(views: &[TourPlanView], trending_states: &[String]) -> TourCatalog {
    let mut trending: Vec<TrendingState> = Vec::new();
    let mut groups: Vec<CategoryGroup> = TourCategory::ORDERED
        .into_iter()
        .map(|category| CategoryGroup {
            category,
            states: Vec::new(),
        })
        .collect();

    for view in views {
        let Some(address) = view.address_details.as_ref() else {
            continue;
        };
        let state = address.state.as_str();
        let price = plan_price(view);
        let image = address.images.first().cloned().unwrap_or_default();

        // Trending entries carry the configured spelling, whatever case the address uses.
        if let Some(name) = trending_states.iter().find(|t| t.eq_ignore_ascii_case(state)) {
            match trending.iter_mut().find(|t| t.state == *name) {
                Some(entry) => {
                    entry.starting_price = min_price(entry.starting_price, price);
                    entry.tour_plans.push(view.clone());
                }
                None => trending.push(TrendingState {
                    state: name.clone(),
                    starting_price: price,
                    image: image.clone(),
                    tour_plans: vec![view.clone()],
                }),
            }
        }

        let Some(category) = categorize(view) else {
            continue;
        };
        let Some(group) = groups.iter_mut().find(|g| g.category == category) else {
            continue;
        };
        match group.states.iter_mut().find(|b| b.state == state) {
            Some(bucket) => {
                bucket.starting_price = min_price(bucket.starting_price, price);
                bucket.tour_plan_count += 1;
                bucket.tour_plans.push(view.clone());
            }
            None => group.states.push(StateBucket {
                state: state.to_string(),
                starting_price: price,
                image,
                tour_plan_count: 1,
                tour_plans: vec![view.clone()],
            }),
        }
    }

    TourCatalog {
        trending_categories: trending,
        data: groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use wayfarer_core::models::{
        AddressSummary, CreateTourPlanRequest, Flag, ThemeSummary, TourPlan,
    };

    fn view(state: Option<&str>, price: Option<f64>, fare: Option<f64>, themes: &[&str]) -> TourPlanView {
        let plan = TourPlan::new(
            CreateTourPlanRequest {
                tour_code: format!("T{}", Utc::now().timestamp_nanos_opt().unwrap_or_default()),
                title: "Plan".to_string(),
                base_fare: fare,
                ..Default::default()
            },
            vec![],
        );
        TourPlanView {
            address_details: state.map(|s| AddressSummary {
                id: Uuid::new_v4(),
                country: "India".to_string(),
                state: s.to_string(),
                city: "City".to_string(),
                images: vec![format!("{}/cover.jpg", s)],
                starting_price: price,
            }),
            start_place_details: None,
            end_place_details: None,
            themes: themes
                .iter()
                .map(|name| ThemeSummary {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    description: None,
                })
                .collect(),
            review_details: vec![],
            plan,
        }
    }

    fn group(catalog: &TourCatalog, category: TourCategory) -> &CategoryGroup {
        catalog
            .data
            .iter()
            .find(|g| g.category == category)
            .unwrap()
    }

    #[test]
    fn test_all_categories_present_in_order() {
        let catalog = build_catalog(&[], &[]);
        let order: Vec<TourCategory> = catalog.data.iter().map(|g| g.category).collect();
        assert_eq!(order, TourCategory::ORDERED.to_vec());
        assert!(catalog.trending_categories.is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let views = vec![view(Some("Goa"), Some(100.0), None, &["BEACH", "HONEYMOON"])];
        let catalog = build_catalog(&views, &[]);
        assert_eq!(group(&catalog, TourCategory::Honeymoon).states.len(), 1);
        assert!(group(&catalog, TourCategory::Beach).states.is_empty());
    }

    #[test]
    fn test_it_top_counts_as_top_destination() {
        let mut v = view(Some("Goa"), None, Some(500.0), &["BEACH"]);
        v.plan.it_top = Flag::Yes;
        let catalog = build_catalog(&[v], &[]);
        assert_eq!(group(&catalog, TourCategory::TopDestinations).states.len(), 1);
        assert!(group(&catalog, TourCategory::Beach).states.is_empty());
    }

    #[test]
    fn test_running_minimum_per_state() {
        let views = vec![
            view(Some("Kerala"), Some(9000.0), None, &["HONEYMOON"]),
            view(Some("Kerala"), Some(0.0), Some(7000.0), &["HONEYMOON"]),
            view(Some("Kerala"), None, None, &["HONEYMOON"]),
            view(Some("Goa"), Some(3000.0), None, &["HONEYMOON"]),
        ];
        let catalog = build_catalog(&views, &[]);
        let states = &group(&catalog, TourCategory::Honeymoon).states;
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].state, "Kerala");
        assert_eq!(states[0].tour_plan_count, 3);
        assert_eq!(states[0].starting_price, Some(7000.0));
        assert_eq!(states[0].image, "Kerala/cover.jpg");
        assert_eq!(states[1].starting_price, Some(3000.0));
    }

    #[test]
    fn test_trending_collected_before_bucketing() {
        let views = vec![
            view(Some("Rajasthan"), Some(12000.0), None, &[]),
            view(Some("rajasthan"), None, Some(8000.0), &["HERITAGE"]),
            view(Some("Andaman"), Some(15000.0), None, &[]),
            view(None, Some(1.0), None, &["HERITAGE"]),
        ];
        let trending = vec!["Rajasthan".to_string(), "Andaman".to_string()];
        let catalog = build_catalog(&views, &trending);

        assert_eq!(catalog.trending_categories.len(), 2);
        assert_eq!(catalog.trending_categories[0].state, "Rajasthan");
        assert_eq!(catalog.trending_categories[0].starting_price, Some(8000.0));
        assert_eq!(catalog.trending_categories[0].tour_plans.len(), 2);
        assert_eq!(catalog.trending_categories[1].state, "Andaman");
        assert_eq!(group(&catalog, TourCategory::Heritage).states.len(), 1);
    }

    #[test]
    fn test_trending_groups_state_case_insensitively() {
        let views = vec![
            view(Some("rajasthan"), Some(9000.0), None, &[]),
            view(Some("RAJASTHAN"), Some(6000.0), None, &[]),
        ];
        let catalog = build_catalog(&views, &["Rajasthan".to_string()]);

        let states: Vec<&str> = catalog
            .trending_categories
            .iter()
            .map(|t| t.state.as_str())
            .collect();
        assert_eq!(states, vec!["Rajasthan"]);
        assert_eq!(catalog.trending_categories[0].starting_price, Some(6000.0));
        assert_eq!(catalog.trending_categories[0].image, "rajasthan/cover.jpg");
    }
}
