use serde_json::{json, Value};

use crate::query::{BoolQuery, QueryClause};
use crate::search::TodoSearchParams;

/// Business logic for translating search parameters into the store's
/// boolean query. Each input that is absent or empty contributes nothing;
/// composition never fails.
pub struct TodoQueryBuilder;

impl TodoQueryBuilder {
    /// Build the boolean query for a search request: scored clauses go to
    /// `must`, exact/range filtering goes to `filter`.
    pub fn build(params: &TodoSearchParams) -> BoolQuery {
        let mut query = BoolQuery::default();

        // A blank query string means "no text filter"; substitute match_all
        // so the boolean query stays valid and sorting is unaffected.
        match Self::text_clause(params) {
            Some(clause) => query.must.push(clause),
            None => query.must.push(QueryClause::MatchAll),
        }

        // The archived flag is always present after normalization; default
        // listings only see non-archived records.
        query.filter.push(QueryClause::Term {
            field: "archived".to_string(),
            value: json!(params.archived),
        });

        Self::push_terms(
            &mut query.filter,
            "status",
            params.status.iter().map(|s| json!(s)).collect(),
        );
        Self::push_terms(
            &mut query.filter,
            "priority",
            params.priority.iter().map(|p| json!(p)).collect(),
        );
        Self::push_terms(
            &mut query.filter,
            "tags",
            params.tags.iter().map(|t| json!(t)).collect(),
        );
        Self::push_terms(
            &mut query.filter,
            "complianceStandards",
            params.compliance_standards.iter().map(|c| json!(c)).collect(),
        );

        if let Some(assignee) = params.assignee.as_deref().filter(|a| !a.trim().is_empty()) {
            query.filter.push(QueryClause::Term {
                field: "assignee".to_string(),
                value: json!(assignee),
            });
        }

        if params.date_from.is_some() || params.date_to.is_some() {
            query.filter.push(QueryClause::Range {
                field: "createdAt".to_string(),
                gte: params.date_from.map(|d| json!(d)),
                lte: params.date_to.map(|d| json!(d)),
            });
        }

        query
    }

    /// Case-normalized phrase-prefix match over title (boost 2) and
    /// description (boost 1); None for a blank query string.
    fn text_clause(params: &TodoSearchParams) -> Option<QueryClause> {
        let text = params.query.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }
        Some(QueryClause::MultiMatchPhrasePrefix {
            query: text.to_lowercase(),
            fields: vec!["title^2".to_string(), "description".to_string()],
        })
    }

    fn push_terms(filter: &mut Vec<QueryClause>, field: &str, values: Vec<Value>) {
        if !values.is_empty() {
            filter.push(QueryClause::Terms {
                field: field.to_string(),
                values,
            });
        }
    }
}
