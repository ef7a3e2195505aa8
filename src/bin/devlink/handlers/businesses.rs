#![deny(clippy::all, clippy::pedantic)]

use devlink::application::error::AppError;
use devlink::application::search::{BusinessSearch, EMPTY_RESULTS_MESSAGE, SearchOutcome};
use devlink::domain::search::SearchFilters;
use devlink_api_types::{BusinessCategory, NewBusiness};
use serde_json::json;

use crate::args::{BusinessesCmd, FilterArgs};
use crate::context::Ctx;
use crate::print::print_json;

pub async fn handle(ctx: &mut Ctx, cmd: BusinessesCmd) -> Result<(), AppError> {
    let mut search =
        BusinessSearch::new(ctx.client.clone(), ctx.client.clone(), ctx.toasts.clone());

    match cmd {
        BusinessesCmd::Search {
            filters,
            select,
            select_all,
            create_campaign,
            campaign_name,
        } => {
            let request = SearchRequest {
                filters,
                select,
                select_all,
                create_campaign,
                campaign_name,
            };
            run_search(ctx, &mut search, request).await
        }
        BusinessesCmd::List { filters } => {
            let businesses = search.list_directory(&SearchFilters::from(filters)).await?;
            print_json(&businesses)
        }
        BusinessesCmd::Add {
            name,
            category,
            country,
            city,
            email,
            phone,
            website,
            address,
        } => {
            let business = NewBusiness {
                name,
                category,
                country,
                city,
                email,
                phone,
                website,
                address,
            };
            print_json(&search.add_business(business).await?)
        }
        BusinessesCmd::Categories => {
            let categories = BusinessCategory::ALL
                .iter()
                .map(|c| json!({"value": c.as_str(), "label": c.label()}))
                .collect::<Vec<_>>();
            print_json(&categories)
        }
    }
}

struct SearchRequest {
    filters: FilterArgs,
    select: Vec<i64>,
    select_all: bool,
    create_campaign: bool,
    campaign_name: Option<String>,
}

async fn run_search(
    ctx: &Ctx,
    search: &mut BusinessSearch,
    request: SearchRequest,
) -> Result<(), AppError> {
    search.set_filters(SearchFilters::from(request.filters));

    search.search().await;
    match search.outcome() {
        SearchOutcome::Failed(message) => {
            ctx.toasts.error(message.clone());
            return Err(AppError::unexpected(message.clone()));
        }
        SearchOutcome::Empty => {
            ctx.toasts.info(EMPTY_RESULTS_MESSAGE);
        }
        SearchOutcome::Idle | SearchOutcome::Results(_) => {
            ctx.toasts
                .info(format!("Found {} businesses", search.results().len()));
        }
    }

    if request.select_all {
        search.toggle_all();
    }
    for id in request.select {
        search.toggle(id);
    }

    if !request.create_campaign {
        return print_json(search.results());
    }

    let created = search
        .create_campaign(request.campaign_name.as_deref())
        .await?;
    print_json(&created)
}
