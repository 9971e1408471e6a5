use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use folio::entry::{Collection, Entry, Term};
use folio::filter::FilterCriteria;
use folio::markdown;
use folio::site::{list, Site};
use folio::util::{format_date, truncate};
use std::path::Path;

const SUMMARY_WIDTH: usize = 120;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("ERROR {:#}", e);
        std::process::exit(1);
    }
}

fn listing_command(name: &'static str, about: &'static str) -> App<'static, 'static> {
    SubCommand::with_name(name)
        .about(about)
        .arg(
            Arg::with_name("search")
                .long("search")
                .short("s")
                .takes_value(true)
                .help("Only show entries whose title or summary contains this text"),
        )
        .arg(
            Arg::with_name("category")
                .long("category")
                .short("c")
                .takes_value(true)
                .help("Only show entries in this category"),
        )
        .arg(
            Arg::with_name("tag")
                .long("tag")
                .short("t")
                .takes_value(true)
                .help("Only show entries with this exact tag"),
        )
        .arg(
            Arg::with_name("page")
                .long("page")
                .short("p")
                .takes_value(true)
                .help("The page to show, starting from 1"),
        )
        .arg(
            Arg::with_name("page-size")
                .long("page-size")
                .takes_value(true)
                .help("Entries per page (defaults to `posts_per_page`)"),
        )
}

fn slug_arg() -> Arg<'static, 'static> {
    Arg::with_name("slug").required(true).index(1)
}

fn run() -> Result<()> {
    let matches = App::new("folio")
        .about("Queries the posts and projects of a portfolio site")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("root")
                .long("root")
                .short("r")
                .takes_value(true)
                .help("A directory at or below the one containing `folio.yaml`"),
        )
        .subcommand(listing_command("posts", "Lists blog posts"))
        .subcommand(listing_command("projects", "Lists projects"))
        .subcommand(
            SubCommand::with_name("post")
                .about("Shows a post with its contents, neighbours, and related posts")
                .arg(slug_arg()),
        )
        .subcommand(
            SubCommand::with_name("project")
                .about("Shows a project with related projects")
                .arg(slug_arg()),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Renders a post body to HTML")
                .arg(slug_arg()),
        )
        .subcommand(
            SubCommand::with_name("taxonomy")
                .about("Lists categories and tags with their entry counts"),
        )
        .subcommand(
            SubCommand::with_name("featured")
                .about("Lists featured projects")
                .arg(
                    Arg::with_name("count")
                        .long("count")
                        .short("n")
                        .takes_value(true)
                        .help("How many projects to show (defaults to `featured_count`)"),
                ),
        )
        .get_matches();

    let root = Path::new(matches.value_of("root").unwrap_or("."));
    let site = Site::from_directory(root)?;

    match matches.subcommand() {
        ("posts", Some(m)) => print_listing(&site, &site.posts, "posts", m),
        ("projects", Some(m)) => print_listing(&site, &site.projects, "projects", m),
        ("post", Some(m)) => print_post(&site, required(m, "slug")?),
        ("project", Some(m)) => print_project(&site, required(m, "slug")?),
        ("render", Some(m)) => {
            let slug = required(m, "slug")?;
            let post = site
                .posts
                .get(slug)
                .ok_or_else(|| anyhow!("No post with slug `{}`", slug))?;
            print!("{}", markdown::render(&post.body).html);
            Ok(())
        }
        ("taxonomy", Some(_)) => {
            print_terms("Post categories", &site.posts.categories());
            print_terms("Post tags", &site.posts.tags());
            print_terms("Project categories", &site.projects.categories());
            print_terms("Technologies", &site.projects.tags());
            Ok(())
        }
        ("featured", Some(m)) => {
            let count = usize_arg(m, "count", site.config.featured_count)?;
            for project in site.projects.featured(count) {
                print_entry(&site, project);
            }
            Ok(())
        }
        _ => Err(anyhow!("Unknown command")),
    }
}

fn required<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str> {
    m.value_of(name)
        .ok_or_else(|| anyhow!("Missing required argument `{}`", name))
}

fn usize_arg(m: &ArgMatches, name: &str, default: usize) -> Result<usize> {
    match m.value_of(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .with_context(|| format!("`--{}` must be a non-negative integer", name)),
    }
}

fn print_listing(site: &Site, collection: &Collection, noun: &str, m: &ArgMatches) -> Result<()> {
    let criteria = FilterCriteria {
        search: m.value_of("search").map(str::to_owned),
        category: m.value_of("category").map(str::to_owned),
        tag: m.value_of("tag").map(str::to_owned),
    };
    let page_size = usize_arg(m, "page-size", site.config.posts_per_page)?;
    if page_size == 0 {
        return Err(anyhow!("`--page-size` must be at least 1"));
    }
    let page = usize_arg(m, "page", 1)?;

    let listing = list(collection, &criteria, page_size, page);
    println!(
        "Page {} of {} ({} {} found)",
        listing.page, listing.total_pages, listing.total_matches, noun
    );
    if listing.entries.is_empty() && !criteria.is_empty() {
        println!("\nNothing matches. Try clearing some filters.");
    }
    for entry in listing.entries {
        println!();
        print_entry(site, entry);
    }
    Ok(())
}

fn print_entry(site: &Site, entry: &Entry) {
    println!("{}", entry.title);
    let mut meta = vec![entry.slug.clone()];
    if let Some(date) = &entry.date {
        meta.push(format_date(date));
    }
    if !entry.categories.is_empty() {
        meta.push(entry.categories.join(", "));
    }
    if !entry.body.is_empty() || entry.reading_time.is_some() {
        meta.push(entry.reading_time(site.config.words_per_minute));
    }
    println!("  {}", meta.join(" · "));
    if !entry.summary.is_empty() {
        println!("  {}", truncate(entry.summary.trim(), SUMMARY_WIDTH));
    }
    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("  {}", tags.join(" "));
    }
}

fn print_related(related: &[&Entry]) {
    if related.is_empty() {
        return;
    }
    println!("\nRelated:");
    for entry in related {
        println!("  {} ({})", entry.title, entry.slug);
    }
}

fn print_post(site: &Site, slug: &str) -> Result<()> {
    let view = site
        .post_view(slug)?
        .ok_or_else(|| anyhow!("No post with slug `{}`", slug))?;
    let post = view.post;

    println!("{}", post.title);
    if let Some(date) = &post.date {
        println!("  {}", format_date(date));
    }
    if let Some(author) = &post.author {
        println!("  by {}", author.name);
    }
    println!("  {}", view.reading_time);
    if !post.tags.is_empty() {
        println!("  {}", post.tags.join(", "));
    }

    if !view.toc.is_empty() {
        println!("\nContents:");
        for heading in &view.toc {
            let indent = "  ".repeat(heading.level - 1);
            println!("{}- {} (#{})", indent, heading.text, heading.id);
        }
    }

    if let Some(previous) = view.adjacent.previous {
        println!("\nPrevious: {} ({})", previous.title, previous.slug);
    }
    if let Some(next) = view.adjacent.next {
        println!("Next: {} ({})", next.title, next.slug);
    }
    print_related(&view.related);

    println!("\nShare:");
    println!("  link      {}", view.share.url);
    println!("  twitter   {}", view.share.twitter);
    println!("  facebook  {}", view.share.facebook);
    println!("  linkedin  {}", view.share.linkedin);
    Ok(())
}

fn print_project(site: &Site, slug: &str) -> Result<()> {
    let view = site
        .project_view(slug)?
        .ok_or_else(|| anyhow!("No project with slug `{}`", slug))?;
    print_entry(site, view.project);
    if let Some(github) = &view.project.links.github {
        println!("  source: {}", github);
    }
    if let Some(live) = &view.project.links.live {
        println!("  live:   {}", live);
    }
    println!("  {}", view.share.url);
    print_related(&view.related);
    Ok(())
}

fn print_terms(title: &str, terms: &[Term]) {
    println!("{}:", title);
    if terms.is_empty() {
        println!("  (none)");
    }
    for term in terms {
        println!("  {} ({})", term.name, term.count);
    }
}
