// src/application/services/render_service.rs
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::config::SiteOpts;
use crate::domain::link::Link;
use crate::domain::repositories::repository::LinkRepository;
use chrono::{Local, TimeZone, Utc};
use itertools::Itertools;
use minijinja::value::Value;
use minijinja::{context, Environment};
use serde::Serialize;
use tracing::{info, instrument};

/// Per-link view model handed to the templates.
///
/// `clean_tags` and `quotable` are derived at render time and never
/// persisted; the stored tag list is already free of pseudo-tags.
#[derive(Serialize, Debug)]
struct LinkView {
    url: String,
    title: String,
    body: String,
    via: Option<String>,
    ts: i64,
    hash: String,
    tags: Vec<String>,
    clean_tags: Vec<String>,
    quotable: bool,
}

impl From<Link> for LinkView {
    fn from(link: Link) -> Self {
        let clean_tags: Vec<String> = link
            .tags
            .iter()
            .filter(|tag| tag.as_str() != "+" && tag.as_str() != "-")
            .cloned()
            .sorted()
            .collect();
        let quotable = clean_tags.iter().any(|tag| tag == "quotable");

        Self {
            url: link.url,
            title: link.title,
            body: link.body,
            via: link.via,
            ts: link.ts,
            hash: link.hash,
            tags: link.tags,
            clean_tags,
            quotable,
        }
    }
}

/// Entry of the machine-readable recent-links feed. Key names are part of
/// the published contract and match the stored column names.
#[derive(Serialize, Debug)]
struct RecentEntry {
    url: String,
    description: String,
    extended: String,
    ts: String,
    quotable: bool,
}

/// Service interface for rendering the static site.
pub trait RenderService: Send + Sync + Debug {
    /// Most recent links into `index.html`.
    fn render_index(&self) -> ApplicationResult<()>;

    /// One page per distinct month plus the `archive.html` index.
    fn render_archives(&self) -> ApplicationResult<()>;

    /// Atom feed into `index.atom`.
    fn render_feed(&self) -> ApplicationResult<()>;

    /// Machine-readable `recent_links.json`.
    fn render_recent_json(&self) -> ApplicationResult<()>;

    /// Everything above; creates the site directory first.
    fn render_all(&self) -> ApplicationResult<()>;
}

pub struct RenderServiceImpl<R: LinkRepository> {
    repository: Arc<R>,
    opts: SiteOpts,
    env: Environment<'static>,
}

impl<R: LinkRepository> Debug for RenderServiceImpl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderServiceImpl")
            .field("opts", &self.opts)
            .field("env", &"<Environment>")
            .finish()
    }
}

fn format_ts(ts: i64, fmt: Option<String>) -> String {
    let fmt = fmt.unwrap_or_else(|| "%Y-%m-%d".to_string());
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format(&fmt).to_string())
        .unwrap_or_default()
}

fn format_ts_rfc3339(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_url(value: Option<String>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            (v.starts_with("http://") || v.starts_with("https://")) && v.len() > 8
        }
        None => false,
    }
}

impl<R: LinkRepository> RenderServiceImpl<R> {
    pub fn new(repository: Arc<R>, opts: SiteOpts) -> Self {
        let mut env = Environment::new();

        env.add_template("links.html", include_str!("../../../templates/links.html"))
            .expect("links.html template is valid");
        env.add_template("archive.html", include_str!("../../../templates/archive.html"))
            .expect("archive.html template is valid");
        env.add_template("atom.xml", include_str!("../../../templates/atom.xml"))
            .expect("atom.xml template is valid");

        env.add_filter("format_ts", format_ts);
        env.add_filter("format_ts_rfc3339", format_ts_rfc3339);
        env.add_filter("is_url", is_url);

        let tag_base_url = opts.tag_base_url.clone();
        env.add_filter("link_tags", move |tags: Vec<String>, joiner: Option<String>| {
            let joiner = joiner.unwrap_or_else(|| " ".to_string());
            let anchors: Vec<String> = tags
                .iter()
                .map(|tag| {
                    let escaped = escape_html(tag);
                    format!("<a href=\"{}{}\">{}</a>", tag_base_url, escaped, escaped)
                })
                .collect();
            Value::from_safe_string(anchors.join(&joiner))
        });

        Self {
            repository,
            opts,
            env,
        }
    }

    fn site_dir(&self) -> &Path {
        Path::new(&self.opts.dir)
    }

    fn write_page(&self, file_name: &str, content: &str) -> ApplicationResult<PathBuf> {
        fs::create_dir_all(self.site_dir())?;
        let path = self.site_dir().join(file_name);
        fs::write(&path, content)?;
        Ok(path)
    }

    fn prepare(&self, links: Vec<Link>) -> Vec<LinkView> {
        links.into_iter().map(LinkView::from).collect()
    }

    fn render_links_page(
        &self,
        page_title: Option<&str>,
        links: Vec<Link>,
    ) -> ApplicationResult<String> {
        let views = self.prepare(links);
        let template = self.env.get_template("links.html")?;
        let rendered = template.render(context! {
            site => Value::from_serialize(&self.opts),
            page => context! { title => page_title },
            links => Value::from_serialize(&views),
        })?;
        Ok(rendered)
    }
}

#[derive(Serialize, Debug)]
struct ArchiveYear {
    year: String,
    months: Vec<String>,
}

impl<R: LinkRepository> RenderService for RenderServiceImpl<R> {
    #[instrument(skip_all, level = "debug")]
    fn render_index(&self) -> ApplicationResult<()> {
        let links = self.repository.most_recent(self.opts.index_count)?;
        let rendered = self.render_links_page(None, links)?;
        let path = self.write_page("index.html", &rendered)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn render_archives(&self) -> ApplicationResult<()> {
        let months = self.repository.distinct_months()?;

        for year_month in &months {
            let links = self.repository.links_in_month(year_month)?;
            let rendered =
                self.render_links_page(Some(&format!("Archive: {}", year_month)), links)?;
            self.write_page(&format!("{}.html", year_month), &rendered)?;
        }

        // distinct_months is newest-first; keep that order within each year.
        let mut years: Vec<ArchiveYear> = Vec::new();
        for (year, month) in months.iter().filter_map(|ym| ym.split_once('-')) {
            match years.last_mut() {
                Some(entry) if entry.year == year => entry.months.push(month.to_string()),
                _ => years.push(ArchiveYear {
                    year: year.to_string(),
                    months: vec![month.to_string()],
                }),
            }
        }

        let template = self.env.get_template("archive.html")?;
        let rendered = template.render(context! {
            site => Value::from_serialize(&self.opts),
            page => context! { title => "Archive" },
            years => Value::from_serialize(&years),
        })?;
        let path = self.write_page("archive.html", &rendered)?;
        info!("Wrote {} and {} month pages", path.display(), months.len());
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn render_feed(&self) -> ApplicationResult<()> {
        let links = self.repository.most_recent(self.opts.feed_count)?;
        let updated = links
            .first()
            .map(|link| link.ts)
            .unwrap_or_else(|| Utc::now().timestamp());
        let views = self.prepare(links);

        let template = self.env.get_template("atom.xml")?;
        let rendered = template.render(context! {
            site => Value::from_serialize(&self.opts),
            updated => updated,
            links => Value::from_serialize(&views),
        })?;
        let path = self.write_page("index.atom", &rendered)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn render_recent_json(&self) -> ApplicationResult<()> {
        let links = self.repository.most_recent(self.opts.recent_count)?;

        let recent: Vec<RecentEntry> = self
            .prepare(links)
            .into_iter()
            .map(|view| RecentEntry {
                url: view.url,
                description: view.title,
                extended: view.body,
                ts: format_ts(view.ts, None),
                quotable: view.quotable,
            })
            .collect();

        let rendered = serde_json::to_string_pretty(&recent)
            .map_err(|e| ApplicationError::Other(format!("serializing recent links: {}", e)))?;
        let path = self.write_page("recent_links.json", &rendered)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn render_all(&self) -> ApplicationResult<()> {
        self.render_index()?;
        self.render_archives()?;
        self.render_feed()?;
        self.render_recent_json()?;
        Ok(())
    }
}
