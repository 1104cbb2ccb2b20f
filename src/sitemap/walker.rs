use crate::sitemap::config::WalkerConfig;
use crate::sitemap::error::SitemapError;
use crate::sitemap::network::NetworkClient;
use crate::sitemap::parser::{parse_entries, EntryKind, ParsedSitemap, SitemapEntry};

use log::{info, warn};
use serde::Serialize;
use std::io::Write;

/// One child sitemap visited during a walk
#[derive(Debug, Clone, Serialize)]
pub struct ChildReport {
    /// The index entry that pointed at this sitemap
    #[serde(flatten)]
    pub entry: SitemapEntry,

    /// Number of `<url>` elements, duplicates included
    pub url_count: usize,

    /// Distinct page entries in document order
    pub pages: Vec<SitemapEntry>,
}

/// Result of walking one sitemap index
#[derive(Debug, Clone, Serialize)]
pub struct WalkReport {
    /// The sitemap index URL
    pub index_url: String,

    /// Number of `<sitemap>` elements, duplicates included
    pub sitemap_count: usize,

    /// Child sitemaps in visiting order
    pub sitemaps: Vec<ChildReport>,

    /// Page URLs whose GET came back with a non-success status
    pub failed_probes: Vec<String>,
}

impl WalkReport {
    /// Total number of distinct page URLs printed
    pub fn page_count(&self) -> usize {
        self.sitemaps.iter().map(|s| s.pages.len()).sum()
    }

    /// Render the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, SitemapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walks a sitemap index and the sitemaps it lists, one request at a time
pub struct Walker {
    /// Walker configuration
    config: WalkerConfig,

    /// Network client for making requests
    network: NetworkClient,
}

impl Walker {
    /// Create a new walker with the given configuration
    pub fn new(config: WalkerConfig) -> Result<Self, SitemapError> {
        config.validate()?;
        let network = NetworkClient::new(&config)?;

        Ok(Self { config, network })
    }

    /// Walk the sitemap index at `index_url`, writing progress lines to `out`.
    ///
    /// Any fault aborts the walk; lines already written stay written.
    pub async fn walk<W: Write>(
        &self,
        index_url: &str,
        out: &mut W,
    ) -> Result<WalkReport, SitemapError> {
        // Echo the input before any request goes out
        writeln!(out, "{}", index_url)?;
        writeln!(out, "running")?;

        info!(
            "Walking sitemap index {} (pairing: {:?}, probe pages: {})",
            index_url, self.config.pairing, self.config.probe_pages
        );

        // Fetch the index and list its child sitemaps
        let index = self.load(index_url, EntryKind::Sitemap).await?;
        writeln!(out, "The number of sitemaps are {}", index.tag_count)?;

        let mut sitemaps = Vec::with_capacity(index.entries.len());
        let mut failed_probes = Vec::new();

        // Children are visited once each, in index order
        for entry in index.entries {
            writeln!(out, "{}", entry.loc)?;

            let child = self.walk_sitemap(&entry.loc, out, &mut failed_probes).await?;

            info!(
                "Sitemap {}: {} url elements, {} distinct",
                entry.loc,
                child.tag_count,
                child.entries.len()
            );

            sitemaps.push(ChildReport {
                entry,
                url_count: child.tag_count,
                pages: child.entries,
            });
        }

        let report = WalkReport {
            index_url: index_url.to_string(),
            sitemap_count: index.tag_count,
            sitemaps,
            failed_probes,
        };

        info!(
            "Walk of {} complete: {} sitemaps, {} page URLs, {} failed probes",
            report.index_url,
            report.sitemaps.len(),
            report.page_count(),
            report.failed_probes.len()
        );

        Ok(report)
    }

    /// Print and probe every page of one child sitemap
    async fn walk_sitemap<W: Write>(
        &self,
        url: &str,
        out: &mut W,
        failed_probes: &mut Vec<String>,
    ) -> Result<ParsedSitemap, SitemapError> {
        let parsed = self.load(url, EntryKind::Url).await?;

        // Raw element count, duplicates included
        writeln!(out, "The number of urls are {}", parsed.tag_count)?;

        for page in &parsed.entries {
            writeln!(out, "{}", page.loc)?;

            if !self.config.probe_pages {
                continue;
            }

            // Transport failures abort; error statuses are only recorded
            let status = self.network.probe(&page.loc).await?;
            if !status.is_success() {
                warn!("Page {} answered with {}", page.loc, status);
                failed_probes.push(page.loc.clone());
            }
        }

        Ok(parsed)
    }

    /// Fetch and parse one document
    async fn load(&self, url: &str, kind: EntryKind) -> Result<ParsedSitemap, SitemapError> {
        let markup = self.network.fetch_markup(url).await?;
        parse_entries(&markup, kind, self.config.pairing, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::parser::PairingMode;
    use mockito::{Mock, ServerGuard};

    fn index_xml(locs: &[String]) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for loc in locs {
            xml.push_str(&format!(
                "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>2018-05-01T10:00:00+00:00</lastmod>\n  </sitemap>\n",
                loc
            ));
        }
        xml.push_str("</sitemapindex>\n");
        xml
    }

    fn urlset_xml(locs: &[String]) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset>\n");
        for loc in locs {
            xml.push_str(&format!(
                "  <url><loc>{}</loc><lastmod>2018-05-01</lastmod></url>\n",
                loc
            ));
        }
        xml.push_str("</urlset>\n");
        xml
    }

    async fn serve(server: &mut ServerGuard, path: &str, body: String) -> Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/xml")
            .with_body(body)
            .create_async()
            .await
    }

    async fn serve_page(server: &mut ServerGuard, path: &str) -> Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await
    }

    fn walker() -> Walker {
        Walker::new(WalkerConfig::default()).unwrap()
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_walk_prints_index_children_and_pages() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let children = vec![format!("{}/posts.xml", base), format!("{}/pages.xml", base)];
        let _index = serve(&mut server, "/index.xml", index_xml(&children)).await;
        let _posts = serve(
            &mut server,
            "/posts.xml",
            urlset_xml(&[format!("{}/p/1", base), format!("{}/p/2", base)]),
        )
        .await;
        let _pages = serve(
            &mut server,
            "/pages.xml",
            urlset_xml(&[format!("{}/about", base)]),
        )
        .await;
        let _p1 = serve_page(&mut server, "/p/1").await;
        let _p2 = serve_page(&mut server, "/p/2").await;
        let _about = serve_page(&mut server, "/about").await;

        let index_url = format!("{}/index.xml", base);
        let mut out = Vec::new();
        let report = walker().walk(&index_url, &mut out).await.unwrap();

        assert_eq!(
            lines(&out),
            vec![
                index_url.clone(),
                "running".to_string(),
                "The number of sitemaps are 2".to_string(),
                format!("{}/posts.xml", base),
                "The number of urls are 2".to_string(),
                format!("{}/p/1", base),
                format!("{}/p/2", base),
                format!("{}/pages.xml", base),
                "The number of urls are 1".to_string(),
                format!("{}/about", base),
            ]
        );

        assert_eq!(report.sitemap_count, 2);
        assert_eq!(report.sitemaps.len(), 2);
        assert_eq!(report.page_count(), 3);
        assert!(report.failed_probes.is_empty());
        assert_eq!(
            report.sitemaps[0].entry.lastmod.as_deref(),
            Some("2018-05-01T10:00:00+00:00")
        );
    }

    #[tokio::test]
    async fn test_every_page_is_probed_once() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let _index = serve(
            &mut server,
            "/index.xml",
            index_xml(&[format!("{}/child.xml", base)]),
        )
        .await;
        let _child = serve(
            &mut server,
            "/child.xml",
            urlset_xml(&[format!("{}/a", base), format!("{}/b", base)]),
        )
        .await;
        let a = server
            .mock("GET", "/a")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let b = server
            .mock("GET", "/b")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let mut out = Vec::new();
        walker()
            .walk(&format!("{}/index.xml", base), &mut out)
            .await
            .unwrap();

        a.assert_async().await;
        b.assert_async().await;
    }

    #[tokio::test]
    async fn test_duplicate_index_entries_fetch_child_once() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let child_url = format!("{}/child.xml", base);
        let _index = serve(
            &mut server,
            "/index.xml",
            index_xml(&[child_url.clone(), child_url.clone()]),
        )
        .await;
        let child = server
            .mock("GET", "/child.xml")
            .with_status(200)
            .with_body(urlset_xml(&[]))
            .expect(1)
            .create_async()
            .await;

        let mut out = Vec::new();
        let report = walker()
            .walk(&format!("{}/index.xml", base), &mut out)
            .await
            .unwrap();

        child.assert_async().await;
        assert_eq!(report.sitemap_count, 2);
        assert_eq!(report.sitemaps.len(), 1);
        let printed = lines(&out);
        assert_eq!(printed[2], "The number of sitemaps are 2");
        assert_eq!(printed.iter().filter(|l| **l == child_url).count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_page_urls_print_once() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let page = format!("{}/same", base);
        let _index = serve(
            &mut server,
            "/index.xml",
            index_xml(&[format!("{}/child.xml", base)]),
        )
        .await;
        let _child = serve(&mut server, "/child.xml", urlset_xml(&[page.clone(), page.clone()])).await;
        let probe = server
            .mock("GET", "/same")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let mut out = Vec::new();
        let report = walker()
            .walk(&format!("{}/index.xml", base), &mut out)
            .await
            .unwrap();

        probe.assert_async().await;
        assert_eq!(report.sitemaps[0].url_count, 2);
        assert_eq!(report.sitemaps[0].pages.len(), 1);
        assert!(lines(&out).contains(&"The number of urls are 2".to_string()));
    }

    #[tokio::test]
    async fn test_network_fault_aborts_without_further_output() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        // Nothing listens on port 1
        let dead = "http://127.0.0.1:1/child.xml".to_string();
        let second = format!("{}/second.xml", base);
        let _index = serve(&mut server, "/index.xml", index_xml(&[dead.clone(), second.clone()])).await;
        let second_mock = server
            .mock("GET", "/second.xml")
            .with_status(200)
            .with_body(urlset_xml(&[]))
            .expect(0)
            .create_async()
            .await;

        let mut out = Vec::new();
        let result = walker().walk(&format!("{}/index.xml", base), &mut out).await;

        assert!(matches!(result, Err(SitemapError::NetworkError(_))));
        let printed = lines(&out);
        assert_eq!(printed.last(), Some(&dead));
        assert!(!printed.contains(&second));
        second_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_page_network_fault_aborts_walk() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        // Nothing listens on port 1
        let dead = "http://127.0.0.1:1/unreachable".to_string();
        let after = format!("{}/after", base);
        let _index = serve(
            &mut server,
            "/index.xml",
            index_xml(&[format!("{}/child.xml", base)]),
        )
        .await;
        let _child = serve(&mut server, "/child.xml", urlset_xml(&[dead.clone(), after.clone()])).await;
        let after_mock = server
            .mock("GET", "/after")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let mut out = Vec::new();
        let result = walker().walk(&format!("{}/index.xml", base), &mut out).await;

        assert!(matches!(result, Err(SitemapError::NetworkError(_))));
        let printed = lines(&out);
        assert_eq!(printed.last(), Some(&dead));
        assert!(!printed.contains(&after));
        after_mock.assert_async().await;
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = WalkerConfig::builder()
            .timeout(std::time::Duration::from_secs(0))
            .build();
        assert!(matches!(
            Walker::new(config),
            Err(SitemapError::InvalidTimeout)
        ));
    }

    #[tokio::test]
    async fn test_index_error_status_aborts() {
        let mut server = mockito::Server::new_async().await;
        let _index = server
            .mock("GET", "/index.xml")
            .with_status(500)
            .create_async()
            .await;

        let index_url = format!("{}/index.xml", server.url());
        let mut out = Vec::new();
        let result = walker().walk(&index_url, &mut out).await;

        assert!(matches!(result, Err(SitemapError::HttpStatus(_))));
        assert_eq!(lines(&out), vec![index_url, "running".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_probe_is_recorded_not_fatal() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let _index = serve(
            &mut server,
            "/index.xml",
            index_xml(&[format!("{}/child.xml", base)]),
        )
        .await;
        let _child = serve(
            &mut server,
            "/child.xml",
            urlset_xml(&[format!("{}/missing", base), format!("{}/ok", base)]),
        )
        .await;
        let _missing = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;
        let _ok = serve_page(&mut server, "/ok").await;

        let mut out = Vec::new();
        let report = walker()
            .walk(&format!("{}/index.xml", base), &mut out)
            .await
            .unwrap();

        assert_eq!(report.failed_probes, vec![format!("{}/missing", base)]);
        assert_eq!(report.page_count(), 2);
    }

    #[tokio::test]
    async fn test_no_probe_skips_page_requests() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let _index = serve(
            &mut server,
            "/index.xml",
            index_xml(&[format!("{}/child.xml", base)]),
        )
        .await;
        let _child = serve(
            &mut server,
            "/child.xml",
            urlset_xml(&[format!("{}/page", base)]),
        )
        .await;
        let page = server
            .mock("GET", "/page")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let config = WalkerConfig::builder().probe_pages(false).build();
        let mut out = Vec::new();
        Walker::new(config)
            .unwrap()
            .walk(&format!("{}/index.xml", base), &mut out)
            .await
            .unwrap();

        page.assert_async().await;
        assert!(lines(&out).contains(&format!("{}/page", base)));
    }

    #[tokio::test]
    async fn test_missing_loc_aborts() {
        let mut server = mockito::Server::new_async().await;
        let _index = serve(
            &mut server,
            "/index.xml",
            "<sitemapindex><sitemap><lastmod>2020-01-01</lastmod></sitemap></sitemapindex>"
                .to_string(),
        )
        .await;

        let mut out = Vec::new();
        let result = walker()
            .walk(&format!("{}/index.xml", server.url()), &mut out)
            .await;

        assert!(matches!(result, Err(SitemapError::MissingTag { .. })));
        assert_eq!(lines(&out).len(), 2);
    }

    #[tokio::test]
    async fn test_empty_index_completes() {
        let mut server = mockito::Server::new_async().await;
        let _index = serve(&mut server, "/index.xml", index_xml(&[])).await;

        let mut out = Vec::new();
        let report = walker()
            .walk(&format!("{}/index.xml", server.url()), &mut out)
            .await
            .unwrap();

        assert_eq!(report.sitemap_count, 0);
        assert_eq!(lines(&out)[2], "The number of sitemaps are 0");
    }

    #[tokio::test]
    async fn test_legacy_pairing_is_used_for_walk() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let index = format!(
            "<sitemapindex><sitemap><loc>{0}/a.xml</loc></sitemap><sitemap><loc>{0}/b.xml</loc><lastmod>2021-01-01</lastmod></sitemap></sitemapindex>",
            base
        );
        let _index = serve(&mut server, "/index.xml", index).await;
        let _a = serve(&mut server, "/a.xml", urlset_xml(&[])).await;
        let _b = serve(&mut server, "/b.xml", urlset_xml(&[])).await;

        let config = WalkerConfig::builder()
            .pairing(PairingMode::FollowingNode)
            .build();
        let mut out = Vec::new();
        let report = Walker::new(config)
            .unwrap()
            .walk(&format!("{}/index.xml", base), &mut out)
            .await
            .unwrap();

        assert_eq!(
            report.sitemaps[0].entry.lastmod.as_deref(),
            Some("2021-01-01")
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = WalkReport {
            index_url: "https://example.com/index.xml".to_string(),
            sitemap_count: 1,
            sitemaps: vec![ChildReport {
                entry: SitemapEntry {
                    loc: "https://example.com/child.xml".to_string(),
                    lastmod: None,
                },
                url_count: 0,
                pages: Vec::new(),
            }],
            failed_probes: Vec::new(),
        };

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["sitemaps"][0]["loc"], "https://example.com/child.xml");
        assert_eq!(json["sitemaps"][0]["url_count"], 0);
        assert!(json["sitemaps"][0]["lastmod"].is_null());
    }
}
