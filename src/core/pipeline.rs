use crate::core::assemble::{assemble, CourseKeys};
use crate::core::extract::{course, encyclopedia, links, ranking};
use crate::core::reconcile::{is_retained, reconcile};
use crate::domain::model::{university_id, Course, Harvest, PartialUniversity, Tables, UniversityTarget};
use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use scraper::Html;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const UNIVERSITIES_SECTION: &str = "Universities.csv";
pub const COURSES_SECTION: &str = "Courses.csv";
pub const SUMMARY_SECTION: &str = "summary.json";

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    generated_at: String,
    target_country: &'a str,
    universities: usize,
    courses: usize,
}

/// Scrapes every configured target in order, one page at a time.
pub struct UniversityPipeline<S: Storage, C: ConfigProvider, F: PageFetcher> {
    storage: S,
    config: C,
    fetcher: F,
}

// `Html` is not `Send`, so parsing stays in sync helpers and never
// lives across an await point.
fn parse_ranking_page(body: &str, slug: &str, base_url: &str) -> (PartialUniversity, Vec<String>) {
    let document = Html::parse_document(body);
    let partial = ranking::extract_university(&document);
    let candidates = links::program_links(&document, slug, base_url);
    (partial, candidates)
}

fn parse_encyclopedia_page(body: &str, page_url: &str) -> PartialUniversity {
    let document = Html::parse_document(body);
    encyclopedia::extract_university(&document, page_url)
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| crate::utils::error::EtlError::IoError(e.into_error()))
}

impl<S: Storage, C: ConfigProvider, F: PageFetcher> UniversityPipeline<S, C, F> {
    pub fn new(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher,
        }
    }

    /// Accepts courses from `candidates` in order until the configured
    /// minimum is reached. Unfetchable pages, extraction errors and
    /// duplicates are skipped and do not count.
    async fn collect_courses(
        &self,
        university_id: &str,
        candidates: &[String],
        keys: &mut CourseKeys,
    ) -> Vec<Course> {
        let wanted = self.config.min_courses_per_university();
        let mut accepted = Vec::new();

        for url in candidates {
            if accepted.len() >= wanted {
                break;
            }

            let Some(body) = self.fetcher.fetch(url).await else {
                continue;
            };

            let course = match course::extract_course(&body, url, university_id) {
                Ok(course) => course,
                Err(e) => {
                    tracing::warn!("Skipping course page {}: {}", url, e);
                    continue;
                }
            };

            if !keys.insert(&course) {
                tracing::debug!("Duplicate course '{}' skipped", course.course_name);
                continue;
            }
            accepted.push(course);
        }

        if accepted.len() < wanted {
            tracing::warn!(
                "{}: only {} of {} courses collected ({} candidate links)",
                university_id,
                accepted.len(),
                wanted,
                candidates.len()
            );
        }
        accepted
    }

    async fn harvest_target(
        &self,
        index: usize,
        target: &UniversityTarget,
        keys: &mut CourseKeys,
        harvest: &mut Harvest,
    ) {
        let id = university_id(index);
        let ranking_url = self.config.ranking_url(&target.slug);

        let Some(ranking_body) = self.fetcher.fetch(&ranking_url).await else {
            tracing::warn!("Ranking page unavailable for {}, skipping", target.slug);
            return;
        };
        let (primary, candidates) =
            parse_ranking_page(&ranking_body, &target.slug, self.config.base_url());

        let secondary = match self.fetcher.fetch(&target.encyclopedia_url).await {
            Some(body) => parse_encyclopedia_page(&body, &target.encyclopedia_url),
            None => {
                tracing::warn!("Encyclopedia page unavailable for {}", target.slug);
                PartialUniversity::default()
            }
        };

        let university = reconcile(&id, &primary, &secondary);
        if !is_retained(&university, self.config.target_country()) {
            tracing::info!(
                "Skipping {} ({}): country '{}' is not {}",
                university.university_name,
                target.slug,
                university.country,
                self.config.target_country()
            );
            return;
        }

        tracing::info!(
            "{} {} ({}, {}): {} program link(s)",
            id,
            university.university_name,
            university.city,
            university.country,
            candidates.len()
        );
        harvest.universities.push(university);

        let courses = self.collect_courses(&id, &candidates, keys).await;
        harvest.courses.extend(courses);
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider, F: PageFetcher> Pipeline for UniversityPipeline<S, C, F> {
    async fn extract(&self) -> Result<Harvest> {
        let mut harvest = Harvest::default();
        let mut keys = CourseKeys::new();

        for (i, target) in self.config.targets().iter().enumerate() {
            self.harvest_target(i + 1, target, &mut keys, &mut harvest)
                .await;
        }

        tracing::debug!("Course key set holds {} entries", keys.len());
        Ok(harvest)
    }

    async fn transform(&self, harvest: Harvest) -> Result<Tables> {
        assemble(harvest)
    }

    async fn load(&self, tables: Tables) -> Result<String> {
        let filename = self.config.output_filename();
        let output_path = format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            filename
        );

        let summary = RunSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            target_country: self.config.target_country(),
            universities: tables.universities.len(),
            courses: tables.courses.len(),
        };

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>(UNIVERSITIES_SECTION, FileOptions::default())?;
            zip.write_all(&to_csv(&tables.universities)?)?;

            zip.start_file::<_, ()>(COURSES_SECTION, FileOptions::default())?;
            zip.write_all(&to_csv(&tables.courses)?)?;

            zip.start_file::<_, ()>(SUMMARY_SECTION, FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(filename, &zip_data).await?;

        Ok(output_path)
    }
}
