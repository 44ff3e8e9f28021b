//! Query-string construction for the ComicVine REST API.

use crate::models::query::{IssueFilter, IssuesQuery, VolumesQuery};

// field_list trims response payloads to the columns the cache actually stores.
const ISSUE_FIELDS: &str = "id,name,issue_number,store_date,cover_date,date_added,\
                            date_last_updated,description,api_detail_url,site_detail_url,\
                            image,volume";
const VOLUME_FIELDS: &str = "id,name,start_year,count_of_issues,publisher";

fn base_params(api_key: &str) -> Vec<(String, String)> {
    vec![
        ("api_key".to_string(), api_key.to_string()),
        ("format".to_string(), "json".to_string()),
    ]
}

pub(crate) fn volume_params(api_key: &str) -> Vec<(String, String)> {
    let mut params = base_params(api_key);
    params.push(("field_list".to_string(), VOLUME_FIELDS.to_string()));
    params
}

pub(crate) fn issues_params(api_key: &str, query: &IssuesQuery) -> Vec<(String, String)> {
    let filter = match query.filter {
        IssueFilter::Volume(id) => format!("volume:{id}"),
        // An exact date is expressed as a degenerate range filter.
        IssueFilter::StoreDate(date) => format!("store_date:{date}|{date}"),
    };

    let mut params = base_params(api_key);
    params.push(("filter".to_string(), filter));
    params.push(("sort".to_string(), "store_date:asc".to_string()));
    params.push(("limit".to_string(), query.page_size.to_string()));
    params.push(("offset".to_string(), query.offset.to_string()));
    params.push(("field_list".to_string(), ISSUE_FIELDS.to_string()));
    params
}

pub(crate) fn volumes_params(api_key: &str, query: &VolumesQuery) -> Vec<(String, String)> {
    let mut params = base_params(api_key);
    params.push(("filter".to_string(), format!("name:{}", query.name)));
    params.push(("sort".to_string(), "count_of_issues:desc".to_string()));
    params.push(("field_list".to_string(), VOLUME_FIELDS.to_string()));
    params
}
