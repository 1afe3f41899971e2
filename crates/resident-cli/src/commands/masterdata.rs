//! Masterdata commands
//!
//! Usage: resident valid-documents --lang-code eng

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};
use resident_core::logging_facility;
use resident_core_types::RequestContext;
use resident_proxy::{
    HttpMasterdataProvider, MasterdataEnvelope, PageParams, ProxyConfig, ProxyFacade,
};

#[derive(Debug, Subcommand)]
pub enum MasterdataCommand {
    /// Valid documents for a language
    ValidDocuments(LangArgs),
    /// Location hierarchy levels for a language
    LocationHierarchyLevels(LangArgs),
    /// Immediate children of a location
    ImmediateChildren(LocationArgs),
    /// Details of a location
    LocationDetails(LocationArgs),
    /// Registration centers near a point
    RegistrationCentersNear(NearArgs),
    /// Documents valid for an applicant type
    ApplicantDocuments(ApplicantArgs),
    /// Registration centers under named locations
    RegistrationCenters(HierarchyArgs),
    /// Paged registration center search
    RegistrationCentersPage(PageArgs),
    /// Working days of a registration center
    WorkingDays(WorkingDaysArgs),
    /// Latest ID schema
    IdSchema(SchemaArgs),
}

#[derive(Debug, Args)]
pub struct LangArgs {
    #[arg(long)]
    pub lang_code: String,
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    #[arg(long)]
    pub location_code: String,
    #[arg(long)]
    pub lang_code: String,
}

#[derive(Debug, Args)]
pub struct NearArgs {
    #[arg(long)]
    pub lang_code: String,
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: String,
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: String,
    /// Search radius in meters
    #[arg(long)]
    pub distance: String,
}

#[derive(Debug, Args)]
pub struct ApplicantArgs {
    #[arg(long)]
    pub applicant_id: String,
    /// Language codes; repeat or comma-separate
    #[arg(long = "language", required = true)]
    pub languages: Vec<String>,
}

#[derive(Debug, Args)]
pub struct HierarchyArgs {
    #[arg(long)]
    pub lang_code: String,
    #[arg(long)]
    pub hierarchy_level: String,
    /// Location name; repeatable
    #[arg(long = "name", required = true)]
    pub names: Vec<String>,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    #[arg(long)]
    pub lang_code: String,
    #[arg(long)]
    pub hierarchy_level: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub page_number: String,
    #[arg(long, default_value = "10")]
    pub page_size: String,
    #[arg(long, default_value = "desc")]
    pub order_by: String,
    #[arg(long, default_value = "createdDateTime")]
    pub sort_by: String,
}

#[derive(Debug, Args)]
pub struct WorkingDaysArgs {
    #[arg(long)]
    pub registration_center_id: String,
    #[arg(long)]
    pub lang_code: String,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[arg(long, default_value = "0")]
    pub schema_version: String,
    #[arg(long)]
    pub domain: String,
    #[arg(long = "type")]
    pub schema_type: String,
}

/// Run one command; `Ok(false)` when the envelope carries an error
pub async fn execute(config_path: Option<&Path>, command: MasterdataCommand) -> anyhow::Result<bool> {
    let config = ProxyConfig::load(config_path).context("loading configuration")?;
    logging_facility::init(config.logging.profile);

    let facade = build_facade(&config)?;
    let ctx = RequestContext::new();
    let envelope = run(&facade, &ctx, command).await;

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(envelope.is_success())
}

fn build_facade(config: &ProxyConfig) -> anyhow::Result<ProxyFacade> {
    let catalog = Arc::new(config.build_catalog().context("building error catalog")?);
    let provider = HttpMasterdataProvider::from_config(&config.provider, catalog.clone())
        .context("building masterdata provider")?;

    Ok(ProxyFacade::builder(Arc::new(provider), catalog)
        .defaults(config.envelope.clone())
        .timeout(config.provider_timeout())
        .build())
}

async fn run(facade: &ProxyFacade, ctx: &RequestContext, command: MasterdataCommand) -> MasterdataEnvelope {
    match command {
        MasterdataCommand::ValidDocuments(a) => {
            facade.get_valid_document_by_lang_code(ctx, &a.lang_code).await
        }
        MasterdataCommand::LocationHierarchyLevels(a) => {
            facade
                .get_location_hierarchy_level_by_lang_code(ctx, &a.lang_code)
                .await
        }
        MasterdataCommand::ImmediateChildren(a) => {
            facade
                .get_immediate_children_by_loc_code_and_lang_code(ctx, &a.location_code, &a.lang_code)
                .await
        }
        MasterdataCommand::LocationDetails(a) => {
            facade
                .get_location_details_by_loc_code_and_lang_code(ctx, &a.location_code, &a.lang_code)
                .await
        }
        MasterdataCommand::RegistrationCentersNear(a) => {
            facade
                .get_coordinate_specific_registration_centers(
                    ctx,
                    &a.lang_code,
                    &a.longitude,
                    &a.latitude,
                    &a.distance,
                )
                .await
        }
        MasterdataCommand::ApplicantDocuments(a) => {
            let languages: Vec<&str> = a.languages.iter().map(String::as_str).collect();
            facade
                .get_applicant_valid_document(ctx, &a.applicant_id, &languages)
                .await
        }
        MasterdataCommand::RegistrationCenters(a) => {
            let names: Vec<&str> = a.names.iter().map(String::as_str).collect();
            facade
                .get_registration_centers_by_hierarchy_level(ctx, &a.lang_code, &a.hierarchy_level, &names)
                .await
        }
        MasterdataCommand::RegistrationCentersPage(a) => {
            let page = PageParams {
                page_number: &a.page_number,
                page_size: &a.page_size,
                order_by: &a.order_by,
                sort_by: &a.sort_by,
            };
            facade
                .get_registration_center_by_hierarchy_level_and_text_paginated(
                    ctx,
                    &a.lang_code,
                    &a.hierarchy_level,
                    &a.name,
                    page,
                )
                .await
        }
        MasterdataCommand::WorkingDays(a) => {
            facade
                .get_registration_center_working_days(ctx, &a.registration_center_id, &a.lang_code)
                .await
        }
        MasterdataCommand::IdSchema(a) => {
            facade
                .get_latest_id_schema(ctx, &a.schema_version, &a.domain, &a.schema_type)
                .await
        }
    }
}
