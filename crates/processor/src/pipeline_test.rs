#[cfg(test)]
mod tests {
    use crate::kpi::KpiOptions;
    use crate::pipeline::*;
    use crate::tests::fake_source::{comment, pr, FakeSource};
    use chrono::{Duration, TimeZone, Utc};
    use common::models::{PrStatus, Repository, StatusFilter, TimeWindow};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap()
    }

    fn repos() -> Vec<Repository> {
        vec![
            Repository {
                id: "id-a".to_string(),
                name: "Alpha".to_string(),
            },
            Repository {
                id: "id-b".to_string(),
                name: "Beta".to_string(),
            },
        ]
    }

    fn target(id: &str, name: &str) -> RepoTarget {
        RepoTarget {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    // select_targets tests
    #[test]
    fn test_select_all_when_nothing_requested() {
        let selection = select_targets(&repos(), &[], &[]);

        assert_eq!(
            selection.targets,
            vec![target("id-a", "Alpha"), target("id-b", "Beta")]
        );
        assert!(selection.unresolved.is_empty());
    }

    #[test]
    fn test_select_by_name_and_id_dedupes() {
        let names = vec!["beta".to_string(), "gamma".to_string()];
        let ids = vec!["ID-B".to_string(), "id-a".to_string(), "raw-id".to_string()];

        let selection = select_targets(&repos(), &names, &ids);

        assert_eq!(
            selection.targets,
            vec![
                target("id-b", "Beta"),
                target("id-a", "Alpha"),
                target("raw-id", "raw-id"),
            ]
        );
        assert_eq!(selection.unresolved, vec!["gamma".to_string()]);
    }

    #[test]
    fn test_select_only_unresolved_names_is_empty() {
        let selection = select_targets(&repos(), &["nope".to_string()], &[]);

        assert!(selection.targets.is_empty());
        assert_eq!(selection.unresolved, vec!["nope".to_string()]);
    }

    // KpiPipeline tests
    #[tokio::test]
    async fn test_run_repo_lists_all_statuses_with_window() {
        let source = FakeSource::default()
            .with_prs(
                "id-a",
                vec![
                    pr(1, "author", t0(), Some(t0() + Duration::hours(2)), PrStatus::Completed),
                    pr(2, "author", t0(), None, PrStatus::Abandoned),
                ],
            )
            .with_thread(1, 10, vec![comment("rev", Some(t0() + Duration::minutes(10)))])
            .with_thread(2, 20, vec![comment("rev", Some(t0() + Duration::minutes(20)))]);
        let window = TimeWindow::last_days(30, t0()).unwrap();
        let pipeline = KpiPipeline::new(&source, KpiOptions::default());

        let kpis = pipeline
            .run_repo(&target("id-a", "Alpha"), Some(window))
            .await
            .unwrap();

        assert_eq!(kpis.pr_count, 2);
        assert_eq!(kpis.samples.dwell_seconds(), vec![600.0, 1200.0]);
        assert_eq!(kpis.samples.completion_seconds(), vec![7200.0]);
        assert_eq!(
            source.pr_queries(),
            vec![("id-a".to_string(), StatusFilter::All, Some(window))]
        );
    }

    #[tokio::test]
    async fn test_run_processes_targets_in_order_and_aggregates() {
        let source = FakeSource::default()
            .with_prs(
                "id-a",
                vec![pr(1, "author", t0(), Some(t0() + Duration::minutes(5)), PrStatus::Completed)],
            )
            .with_prs(
                "id-b",
                vec![pr(
                    2,
                    "author",
                    t0(),
                    Some(t0() + Duration::minutes(15)),
                    PrStatus::Completed,
                )],
            );
        let pipeline = KpiPipeline::new(&source, KpiOptions::default());

        let project = pipeline
            .run(&[target("id-a", "Alpha"), target("id-b", "Beta")], None)
            .await
            .unwrap();

        assert_eq!(project.repos.len(), 2);
        assert_eq!(project.combined().completion_seconds(), vec![300.0, 900.0]);

        let report = project.render("org/proj").unwrap();
        assert!(report.starts_with("Repository: Alpha\n"));
        assert!(report.contains("\n\nRepository: Beta\n"));
        assert!(report.contains("Repository: org/proj (2 repositories)"));
        assert!(report.contains("   Samples: 2\n   P50: 00:10:00"));
    }

    #[tokio::test]
    async fn test_single_repo_render_has_no_project_summary() {
        let source = FakeSource::default();
        let pipeline = KpiPipeline::new(&source, KpiOptions::default());

        let project = pipeline.run(&[target("id-a", "Alpha")], None).await.unwrap();
        let report = project.render("org/proj").unwrap();

        assert!(report.starts_with("Repository: Alpha\n"));
        assert!(!report.contains("repositories)"));
    }

    #[tokio::test]
    async fn test_run_aborts_on_first_failing_repo() {
        let source = FakeSource::default().failing_repo("id-a");
        let pipeline = KpiPipeline::new(&source, KpiOptions::default());

        let result = pipeline
            .run(&[target("id-a", "Alpha"), target("id-b", "Beta")], None)
            .await;

        assert!(result.is_err());
        assert_eq!(source.pr_queries().len(), 1);
    }
}
