//! Command-line front end for the icon library.
//!
//! Usage:
//!   iconics add 100 document --tags file text --category files
//!   iconics search lock
//!   iconics export ../my-project lock gear
//!   iconics import-csv batch.csv

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iconics::{
    CatalogError, CatalogStore, ImportSummary, IntegrityReport, LibraryLayout, NewEntry,
    Projection, UpsertKind, export_category, export_to_project, find_library_root,
    generate_suggestions, import_csv, split_list, stats, templates, validate,
    write_suggestions_csv,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "iconics")]
#[command(about = "Icon library management: catalog, search, and export semantic icons")]
struct Cli {
    /// Library root; defaults to $ICONICS_ROOT or the nearest directory
    /// holding icon-catalog.json.
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an icon to the catalog, or update it if the id exists.
    Add {
        icon_id: String,
        semantic_name: String,
        #[arg(long, num_args = 1.., required = true)]
        tags: Vec<String>,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Search icons by tag or semantic name.
    Search { query: String },
    /// List icons in a category.
    List { category: String },
    /// Copy icons into a project's .github/assets/icons/ directory.
    Export {
        project_path: PathBuf,
        #[arg(required = true)]
        icons: Vec<String>,
    },
    /// Copy every icon of a category into a project.
    ExportCategory {
        project_path: PathBuf,
        category: String,
    },
    /// Show catalog statistics.
    Stats,
    /// Bulk import icons from a CSV file (id,semantic,tags,category,description).
    ImportCsv { csv_file: PathBuf },
    /// Write a CSV of suggestions for uncataloged images.
    GenerateCsv {
        output_file: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create a reusable template for icon families.
    CreateTemplate {
        name: String,
        #[arg(long, num_args = 1.., required = true)]
        tags: Vec<String>,
        #[arg(long)]
        category: String,
    },
    /// Apply a template to icons listed in a CSV (id,semantic,extra_tags,description).
    ApplyTemplate { template: String, csv_file: PathBuf },
    /// Check catalog and symlink tree agreement.
    Validate,
    /// Show details for one icon.
    Info { semantic_name: String },
    /// Show recently cataloged icons.
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Add a category to the catalog.
    AddCategory { name: String },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = find_library_root(cli.root.as_deref())?;
    let mut store = CatalogStore::open(LibraryLayout::new(root)).context("loading catalog")?;

    match cli.command {
        Command::Add {
            icon_id,
            semantic_name,
            tags,
            category,
            description,
        } => run_add(
            &mut store,
            NewEntry {
                id: icon_id,
                semantic_name,
                tags: tags.iter().flat_map(|t| split_list(t)).collect(),
                category,
                description,
            },
        ),
        Command::Search { query } => {
            run_search(&store, &query);
            Ok(())
        }
        Command::List { category } => {
            run_list(&store, &category);
            Ok(())
        }
        Command::Export {
            project_path,
            icons,
        } => {
            let report = export_to_project(&mut store, &project_path, &icons)?;
            print_export(&report);
            Ok(())
        }
        Command::ExportCategory {
            project_path,
            category,
        } => run_export_category(&mut store, &project_path, &category),
        Command::Stats => run_stats(&store),
        Command::ImportCsv { csv_file } => {
            let summary = import_csv(&mut store, &csv_file)?;
            print_import(&summary);
            Ok(())
        }
        Command::GenerateCsv { output_file, limit } => {
            run_generate(&store, &output_file, limit)
        }
        Command::CreateTemplate {
            name,
            tags,
            category,
        } => {
            let tags: Vec<String> = tags.iter().flat_map(|t| split_list(t)).collect();
            let template = templates::create_template(&store, &name, tags, &category)?;
            println!("✓ Created template '{name}'");
            println!("  Category: {}", template.category);
            println!("  Tags: {}", template.tags.join(", "));
            Ok(())
        }
        Command::ApplyTemplate { template, csv_file } => {
            run_apply_template(&mut store, &template, &csv_file)
        }
        Command::Validate => {
            let report = validate(&store)?;
            print_validation(&report);
            Ok(())
        }
        Command::Info { semantic_name } => {
            run_info(&store, &semantic_name);
            Ok(())
        }
        Command::Recent { limit } => {
            run_recent(&store, limit);
            Ok(())
        }
        Command::AddCategory { name } => {
            if store.add_category(&name)? {
                println!("✓ Added category '{}'", name.trim());
            } else {
                println!("Category '{}' already exists", name.trim());
            }
            Ok(())
        }
    }
}

/// Print a negative result without failing the process.
fn report_negative(err: anyhow::Error) -> Result<()> {
    match err.downcast_ref::<CatalogError>() {
        Some(
            CatalogError::UnknownCategory { .. }
            | CatalogError::UnknownTemplate { .. }
            | CatalogError::NoTemplates
            | CatalogError::IconNotFound(_),
        ) => {
            println!("✗ {err}");
            Ok(())
        }
        _ => Err(err),
    }
}

fn run_add(store: &mut CatalogStore, entry: NewEntry) -> Result<()> {
    let id = entry.id.trim().to_string();
    let outcome = store.upsert(entry)?;
    let verb = match outcome.kind {
        UpsertKind::Inserted => "Added",
        UpsertKind::Updated => "Updated",
    };
    if let Some(icon) = store.find_by_id(&id) {
        println!("✓ {verb} icon {} ({})", icon.id, icon.semantic_name);
    }
    match outcome.projection {
        Projection::Linked(path) => println!("  → Created symlink: {}", path.display()),
        Projection::Deferred { source } => {
            println!("  ⚠ Source {} not found; symlink deferred", source.display())
        }
    }
    Ok(())
}

fn run_search(store: &CatalogStore, query: &str) {
    let results = store.catalog().search(query);
    if results.is_empty() {
        println!("No icons found matching '{query}'");
        return;
    }
    println!("\nFound {} icon(s) matching '{query}':", results.len());
    for icon in results {
        println!(
            "  {:20} #{:4}  [{}]  Tags: {}",
            icon.semantic_name,
            icon.id,
            icon.category,
            icon.tags.join(", ")
        );
    }
}

fn run_list(store: &CatalogStore, category: &str) {
    if let Err(err) = store.catalog().ensure_category(category) {
        println!("✗ {err}");
        return;
    }
    let icons = store.catalog().in_category(category);
    if icons.is_empty() {
        println!("No icons found in category '{category}'");
        return;
    }
    println!("\n{} ({} icons):", category.to_uppercase(), icons.len());
    println!("{}", "-".repeat(60));
    for icon in icons {
        println!(
            "  {:20} (#{})  Tags: {}",
            icon.semantic_name,
            icon.id,
            icon.tags.join(", ")
        );
    }
}

fn run_export_category(
    store: &mut CatalogStore,
    project: &Path,
    category: &str,
) -> Result<()> {
    match export_category(store, project, category) {
        Ok(report) if report.exported.is_empty() && report.missing_source.is_empty() => {
            println!("No icons found in category '{category}'");
            Ok(())
        }
        Ok(report) => {
            print_export(&report);
            Ok(())
        }
        Err(err) => report_negative(err),
    }
}

fn print_export(report: &iconics::ExportReport) {
    for name in &report.not_found {
        println!("✗ Icon '{name}' not found in catalog");
    }
    for name in &report.missing_source {
        println!("✗ Source image for '{name}' is missing");
    }
    for name in &report.exported {
        println!("✓ Exported {name}");
    }
    if !report.exported.is_empty() {
        println!(
            "\n✓ Exported {} icons to {}",
            report.exported.len(),
            report.target_dir.display()
        );
    }
}

fn run_stats(store: &CatalogStore) -> Result<()> {
    let stats = stats::collect(store)?;
    println!("\n=== Icon Library Statistics ===");
    println!("Total icons in library: {}", stats.raw_images);
    println!("Cataloged: {} ({:.1}%)", stats.cataloged, stats.coverage_pct);
    println!("Uncataloged: {}", stats.uncataloged);

    println!("\n=== Category Breakdown ===");
    for (category, breakdown) in &stats.by_category {
        println!("\n{} ({} icons):", category.to_uppercase(), breakdown.count);
        for name in &breakdown.samples {
            println!("  • {name}");
        }
        if breakdown.count > breakdown.samples.len() {
            println!("  ... and {} more", breakdown.count - breakdown.samples.len());
        }
    }

    if !stats.most_used.is_empty() {
        println!("\n=== Most Used Icons ===");
        for (name, projects) in &stats.most_used {
            println!(
                "  {:15} used in {} project(s): {}",
                name,
                projects.len(),
                projects.join(", ")
            );
        }
    }

    if !stats.projects.is_empty() {
        let projects: Vec<&str> = stats.projects.iter().map(String::as_str).collect();
        println!("\n=== Project Usage ===");
        println!(
            "Icons used in {} project(s): {}",
            projects.len(),
            projects.join(", ")
        );
    }
    Ok(())
}

fn print_import(summary: &ImportSummary) {
    for issue in &summary.issues {
        let marker = if issue.is_duplicate() { "⚠" } else { "✗" };
        println!("  {marker} Row {}: {}, skipping", issue.row, issue.problem);
    }
    println!("\n=== Import Summary ===");
    println!("✓ Successfully imported: {} icons", summary.succeeded);
    if summary.errors > 0 {
        println!("✗ Errors/Skipped: {}", summary.errors);
    }
    if summary.duplicates > 0 {
        println!("⚠ Already cataloged: {}", summary.duplicates);
    }
    println!("Total cataloged icons: {}", summary.catalog_size);
}

fn run_generate(store: &CatalogStore, output: &Path, limit: Option<usize>) -> Result<()> {
    let rows = generate_suggestions(store.layout(), store.catalog(), limit)?;
    if rows.is_empty() {
        println!("✓ All icons are already cataloged!");
        return Ok(());
    }
    write_suggestions_csv(output, &rows)?;
    println!("\n✓ Generated {} icon suggestions", rows.len());
    println!("✓ Saved to: {}", output.display());
    println!("\nNext steps:");
    println!("1. Review and edit {} in a spreadsheet", output.display());
    println!("2. Improve tags and descriptions as needed");
    println!("3. Import with: iconics import-csv {}", output.display());
    Ok(())
}

fn run_apply_template(
    store: &mut CatalogStore,
    template: &str,
    csv_file: &Path,
) -> Result<()> {
    let specs = templates::read_specs_file(csv_file)?;
    match templates::apply_template(store, template, &specs) {
        Ok(summary) => {
            for id in &summary.skipped {
                println!("  ⚠ '{id}' already exists, skipping");
            }
            for (id, reason) in &summary.failed {
                println!("  ✗ '{id}': {reason}");
            }
            println!("\n✓ Applied template to {} icons", summary.applied);
            Ok(())
        }
        Err(err) => report_negative(err),
    }
}

fn print_validation(report: &IntegrityReport) {
    println!("\n=== Validating Icon Catalog ===\n");
    if report.is_clean() {
        println!("✓ Catalog validation passed! No issues found.");
    }
    if !report.issues.is_empty() {
        println!("Found {} issue(s):", report.issues.len());
        for issue in &report.issues {
            println!("  ✗ {issue}");
        }
    }
    if !report.warnings.is_empty() {
        println!("\nFound {} warning(s):", report.warnings.len());
        for warning in &report.warnings {
            println!("  ⚠ {warning}");
        }
    }
    println!("\nSummary:");
    println!("  Total icons in catalog: {}", report.total_icons);
    println!("  Issues: {}", report.issues.len());
    println!("  Warnings: {}", report.warnings.len());
}

fn run_info(store: &CatalogStore, semantic_name: &str) {
    let Some(icon) = store.catalog().first_by_semantic(semantic_name) else {
        println!("✗ {}", CatalogError::IconNotFound(semantic_name.to_string()));
        return;
    };
    let layout = store.layout();
    let source = layout.resolve(&icon.filename);
    let link = layout.link_path(&icon.category, &icon.semantic_name, icon.extension());

    println!("\n=== Icon Information ===");
    println!("Semantic Name: {}", icon.semantic_name);
    println!("Icon ID: #{}", icon.id);
    println!("Filename: {}", icon.filename);
    println!("Category: {}", icon.category);
    if icon.description.is_empty() {
        println!("Description: No description");
    } else {
        println!("Description: {}", icon.description);
    }
    if icon.tags.is_empty() {
        println!("Tags: none");
    } else {
        println!("Tags: {}", icon.tags.join(", "));
    }
    if icon.used_in.is_empty() {
        println!("Used in projects: none");
    } else {
        println!("Used in projects: {}", icon.used_in.join(", "));
    }

    println!("\nFile Status:");
    println!("  Source: {} ({})", status(source.exists()), source.display());
    println!("  Symlink: {} ({})", status(link.exists()), link.display());
}

fn status(present: bool) -> &'static str {
    if present { "✓ exists" } else { "✗ missing" }
}

fn run_recent(store: &CatalogStore, limit: usize) {
    let icons = store.catalog().recent(limit);
    if icons.is_empty() {
        println!("No icons in catalog");
        return;
    }
    println!("\n=== Recently Cataloged Icons (last {}) ===\n", icons.len());
    for icon in icons {
        let mut tags = icon.tags.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
        if icon.tags.len() > 5 {
            tags.push_str(", ...");
        }
        println!(
            "  {:20} #{:4}  [{:12}]  {}",
            icon.semantic_name, icon.id, icon.category, tags
        );
    }
}
