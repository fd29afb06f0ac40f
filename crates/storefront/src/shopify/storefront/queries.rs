//! GraphQL query definitions for Shopify Storefront API.

use graphql_client::GraphQLQuery;

// Scalar types for Shopify GraphQL schema
// Must be defined in the same module where GraphQLQuery derive is used
// Note: These MUST match the GraphQL schema scalar names exactly (uppercase)
#[allow(clippy::upper_case_acronyms)]
pub type Decimal = String;
#[allow(clippy::upper_case_acronyms)]
pub type URL = String;

// Catalog query
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/catalog.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetCatalog;
