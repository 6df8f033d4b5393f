#[cfg(test)]
mod tests {
    use crate::kpi::*;
    use crate::tests::fake_source::{comment, pr, FakeSource};
    use chrono::{Duration, TimeZone, Utc};
    use common::models::PrStatus;

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap()
    }

    // compute_first_response_time tests
    #[tokio::test]
    async fn test_first_response_ignores_author_comments() {
        let pr = pr(1, "author", t0(), None, PrStatus::Active);
        let source = FakeSource::default()
            .with_thread(1, 100, vec![comment("author", Some(t0() + Duration::minutes(3)))])
            .with_thread(
                1,
                101,
                vec![
                    comment("reviewer", Some(t0() + Duration::minutes(12))),
                    comment("reviewer", Some(t0() + Duration::minutes(8))),
                ],
            );

        let dwell = compute_first_response_time(&source, "repo", &pr, &KpiOptions::default())
            .await
            .unwrap();

        assert_eq!(dwell, Some(480.0));
    }

    #[tokio::test]
    async fn test_first_response_only_author_comments_is_none() {
        let pr = pr(1, "author", t0(), None, PrStatus::Active);
        let source = FakeSource::default().with_thread(
            1,
            100,
            vec![
                comment("author", Some(t0() + Duration::minutes(1))),
                comment("author", Some(t0() + Duration::minutes(2))),
            ],
        );

        let dwell = compute_first_response_time(&source, "repo", &pr, &KpiOptions::default())
            .await
            .unwrap();

        assert_eq!(dwell, None);
    }

    #[tokio::test]
    async fn test_first_response_without_threads_is_none() {
        let pr = pr(1, "author", t0(), None, PrStatus::Active);
        let source = FakeSource::default();

        let dwell = compute_first_response_time(&source, "repo", &pr, &KpiOptions::default())
            .await
            .unwrap();

        assert_eq!(dwell, None);
    }

    #[tokio::test]
    async fn test_first_response_skips_untimestamped_comments() {
        let pr = pr(1, "author", t0(), None, PrStatus::Active);
        let source = FakeSource::default().with_thread(
            1,
            100,
            vec![
                comment("reviewer", None),
                comment("other", Some(t0() + Duration::hours(1))),
            ],
        );

        let dwell = compute_first_response_time(&source, "repo", &pr, &KpiOptions::default())
            .await
            .unwrap();

        assert_eq!(dwell, Some(3600.0));
    }

    #[tokio::test]
    async fn test_first_response_before_creation_is_none() {
        let pr = pr(1, "author", t0(), None, PrStatus::Active);
        let source = FakeSource::default().with_thread(
            1,
            100,
            vec![comment("reviewer", Some(t0() - Duration::minutes(5)))],
        );

        let dwell = compute_first_response_time(&source, "repo", &pr, &KpiOptions::default())
            .await
            .unwrap();

        assert_eq!(dwell, None);
    }

    #[tokio::test]
    async fn test_bot_filter_changes_first_response() {
        let pr = pr(1, "author", t0(), None, PrStatus::Active);
        let mut bot = comment("svc", Some(t0() + Duration::minutes(1)));
        bot.author_display_name = Some("Project Build Service".to_string());
        let source = FakeSource::default().with_thread(
            1,
            100,
            vec![bot, comment("reviewer", Some(t0() + Duration::minutes(30)))],
        );

        let unfiltered = compute_first_response_time(&source, "repo", &pr, &KpiOptions::default())
            .await
            .unwrap();
        let filtered = compute_first_response_time(
            &source,
            "repo",
            &pr,
            &KpiOptions { ignore_bots: true },
        )
        .await
        .unwrap();

        assert_eq!(unfiltered, Some(60.0));
        assert_eq!(filtered, Some(1800.0));
    }

    #[test]
    fn test_is_probable_bot() {
        assert!(is_probable_bot(Some("dependabot")));
        assert!(is_probable_bot(Some("Azure Pipelines")));
        assert!(is_probable_bot(Some("Project Collection Build Service (org)")));
        assert!(!is_probable_bot(Some("Jane Reviewer")));
        assert!(!is_probable_bot(None));
    }

    // compute_completion_time tests
    #[test]
    fn test_completion_time_for_completed_pr() {
        let closed = t0() + Duration::minutes(150);
        let pr = pr(1, "author", t0(), Some(closed), PrStatus::Completed);

        assert_eq!(compute_completion_time(&pr), Some(9000.0));
    }

    #[test]
    fn test_completion_time_none_for_active_pr() {
        let closed = t0() + Duration::hours(1);
        let pr = pr(1, "author", t0(), Some(closed), PrStatus::Active);

        assert_eq!(compute_completion_time(&pr), None);
    }

    #[test]
    fn test_completion_time_none_for_abandoned_pr() {
        let closed = t0() + Duration::hours(1);
        let pr = pr(1, "author", t0(), Some(closed), PrStatus::Abandoned);

        assert_eq!(compute_completion_time(&pr), None);
    }

    #[test]
    fn test_completion_time_none_without_closed_date() {
        let pr = pr(1, "author", t0(), None, PrStatus::Completed);

        assert_eq!(compute_completion_time(&pr), None);
    }

    #[test]
    fn test_completion_time_none_when_negative() {
        let closed = t0() - Duration::hours(1);
        let pr = pr(1, "author", t0(), Some(closed), PrStatus::Completed);

        assert_eq!(compute_completion_time(&pr), None);
    }

    // collect_kpi_samples tests
    #[tokio::test]
    async fn test_collect_kpi_samples_two_pr_batch() {
        let pr1 = pr(
            1,
            "author",
            t0(),
            Some(t0() + Duration::minutes(150)),
            PrStatus::Completed,
        );
        let pr2 = pr(2, "author", t0(), None, PrStatus::Active);
        let source = FakeSource::default().with_thread(
            1,
            100,
            vec![comment("reviewer", Some(t0() + Duration::minutes(8)))],
        );

        let samples = collect_kpi_samples(&source, "repo", &[pr1, pr2], &KpiOptions::default())
            .await
            .unwrap();

        assert_eq!(samples.dwell_seconds(), vec![480.0]);
        assert_eq!(samples.completion_seconds(), vec![9000.0]);
        assert_eq!(samples.dwell[0].pr_id, 1);
        assert_eq!(samples.completion[0].pr_id, 1);
        assert_eq!(samples.prs_without_response, 1);
        assert_eq!(samples.prs_without_completion, 1);
    }

    #[tokio::test]
    async fn test_collect_kpi_samples_propagates_client_errors() {
        let pr1 = pr(1, "author", t0(), None, PrStatus::Active);
        let source = FakeSource::default().failing_threads_for(1);

        let result = collect_kpi_samples(&source, "repo", &[pr1], &KpiOptions::default()).await;

        assert!(result.is_err());
    }

    #[test]
    fn test_samples_extend_keeps_order() {
        let mut a = KpiSamples {
            prs_without_response: 1,
            ..Default::default()
        };
        let b = KpiSamples {
            dwell: vec![common::models::KpiSample {
                pr_id: 9,
                kind: common::models::MetricKind::Dwell,
                seconds: 5.0,
            }],
            prs_without_completion: 2,
            ..Default::default()
        };

        a.extend(&b);

        assert_eq!(a.dwell_seconds(), vec![5.0]);
        assert_eq!(a.prs_without_response, 1);
        assert_eq!(a.prs_without_completion, 2);
    }
}
