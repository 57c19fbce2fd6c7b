use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

use crate::data::{builder, comparison, histogram, query, stats};
use crate::types::{
    ComparisonMode, ComparisonState, CountryRecord, DataError, Dataset, SeriesValues, Year,
};

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn record(name: &str, points: &[(Year, f64)]) -> CountryRecord {
    CountryRecord {
        name: name.to_string(),
        series: points.iter().copied().collect::<BTreeMap<_, _>>(),
    }
}

fn dataset(records: Vec<CountryRecord>) -> Dataset {
    Dataset::new(records)
}

mod builder_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preserves_row_order() {
        let data = builder::build_dataset(&grid(&[
            &["Country", "2000", "2001"],
            &["Spain", "100", "110"],
            &["France", "200", "210"],
            &["Italy", "300", "310"],
        ]))
        .unwrap();

        let names: Vec<&str> = data.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Spain", "France", "Italy"]);
    }

    #[test]
    fn test_drops_rows_with_empty_name() {
        let data = builder::build_dataset(&grid(&[
            &["Country", "2000"],
            &["Spain", "100"],
            &["", "999"],
            &["   ", "999"],
            &["France", "200"],
        ]))
        .unwrap();

        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_absent_cell_is_omitted_not_zero() {
        let data = builder::build_dataset(&grid(&[
            &["Country", "2000", "2001", "2002"],
            &["Spain", "100", "", "300"],
        ]))
        .unwrap();

        let record = &data.records()[0];
        assert_eq!(record.series.get(&2000), Some(&100.0));
        assert_eq!(record.series.get(&2001), None);
        assert_eq!(record.series.get(&2002), Some(&300.0));
    }

    #[test]
    fn test_short_row_is_padded_with_absent() {
        let data = builder::build_dataset(&grid(&[
            &["Country", "2000", "2001"],
            &["Spain", "100"],
        ]))
        .unwrap();

        let record = &data.records()[0];
        assert_eq!(record.series.len(), 1);
        assert!(!record.series.contains_key(&2001));
    }

    #[test]
    fn test_unparsable_value_is_omitted() {
        let data = builder::build_dataset(&grid(&[
            &["Country", "2000", "2001"],
            &["Spain", "abc", "200"],
        ]))
        .unwrap();

        assert_eq!(data.records()[0].series.len(), 1);
    }

    #[test]
    fn test_missing_header_is_parse_error() {
        let err = builder::build_dataset(&[]).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));

        let err = builder::build_dataset(&grid(&[&["Country"]])).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_non_year_header_cell_is_parse_error() {
        let err = builder::build_dataset(&grid(&[
            &["Country", "2000", "not-a-year"],
            &["Spain", "100", "200"],
        ]))
        .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_duplicate_name_first_row_wins() {
        let data = builder::build_dataset(&grid(&[
            &["Country", "2000"],
            &["Spain", "100"],
            &["Spain", "999"],
        ]))
        .unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(data.records()[0].series.get(&2000), Some(&100.0));
    }
}

mod query_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_by_name() {
        let data = dataset(vec![record("Spain", &[(2000, 100.0)])]);
        assert!(query::find_by_name(&data, "Spain").is_some());
        assert!(query::find_by_name(&data, "Atlantis").is_none());
    }

    #[test]
    fn test_sorted_years_ascending() {
        let record = record("Spain", &[(2002, 3.0), (1960, 1.0), (1999, 2.0)]);
        assert_eq!(query::sorted_years(&record), vec![1960, 1999, 2002]);
        assert_eq!(query::valid_values(&record), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let data = dataset(vec![
            record("Spain", &[]),
            record("United Kingdom", &[]),
            record("United States", &[]),
        ]);
        let hits = query::search_by_name(&data, "united");
        let names: Vec<&str> = hits.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["United Kingdom", "United States"]);
    }
}

mod stats_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_series() {
        let years = [2000, 2001, 2002, 2003];
        let values = [100.0, 200.0, 200.0, 300.0];
        let stats = stats::derive_stats(&years, &values).unwrap();

        assert!((stats.mean - 200.0).abs() < 1e-9);
        assert_eq!(stats.mode, 200.0);
        assert!((stats.variance - 5000.0).abs() < 1e-9);
        assert!((stats.std_dev - 70.710678).abs() < 1e-6);
        assert_eq!(stats.sum, 800.0);
        assert_eq!(stats.max, 300.0);
        assert_eq!(stats.max_year, 2003);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.min_year, 2000);
    }

    #[test]
    fn test_mean_times_count_is_sum() {
        let years = [1, 2, 3, 4, 5];
        let values = [1.5, 2.25, 8.0, 13.75, 100.5];
        let stats = stats::derive_stats(&years, &values).unwrap();
        assert!((stats.mean * values.len() as f64 - stats.sum).abs() < 1e-9);
    }

    #[test]
    fn test_variance_nonnegative_and_std_dev_is_sqrt() {
        let years = [1, 2, 3];
        let values = [5.0, 5.0, 5.0];
        let stats = stats::derive_stats(&years, &values).unwrap();
        assert!(stats.variance >= 0.0);
        assert_eq!(stats.std_dev, stats.variance.sqrt());
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn test_extremum_tie_takes_first_year() {
        let years = [2000, 2001, 2002];
        let values = [7.0, 7.0, 1.0];
        let stats = stats::derive_stats(&years, &values).unwrap();
        assert_eq!(stats.max_year, 2000);
        assert_eq!(stats.min_year, 2002);
    }

    #[test]
    fn test_mode_tie_first_to_reach_frequency_wins() {
        let years = [1, 2];
        let values = [10.0, 20.0];
        let stats = stats::derive_stats(&years, &values).unwrap();
        assert_eq!(stats.mode, 10.0);

        let years = [1, 2, 3, 4];
        let values = [20.0, 10.0, 10.0, 20.0];
        let stats = stats::derive_stats(&years, &values).unwrap();
        // 10 reaches a count of two before 20 does
        assert_eq!(stats.mode, 10.0);
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let err = stats::derive_stats(&[], &[]).unwrap_err();
        assert!(matches!(err, DataError::EmptySeries));
    }

    #[test]
    fn test_mismatched_lengths_are_rejected() {
        let err = stats::derive_stats(&[2000], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }
}

mod histogram_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_sum_to_input_length() {
        let values: Vec<f64> = (0..57).map(|i| (i * 13 % 101) as f64).collect();
        let hist = histogram::bin_values(&values).unwrap();
        assert_eq!(hist.counts.len(), histogram::BUCKET_COUNT);
        assert_eq!(hist.total(), values.len());
    }

    #[test]
    fn test_max_value_lands_in_last_bucket() {
        let values = [0.0, 1.0, 2.0, 3.0, 10.0];
        let hist = histogram::bin_values(&values).unwrap();
        assert_eq!(*hist.counts.last().unwrap(), 1);
        assert_eq!(hist.total(), values.len());
    }

    #[test]
    fn test_bucket_bounds_are_contiguous() {
        let values = [0.0, 100.0];
        let hist = histogram::bin_values(&values).unwrap();
        assert_eq!(hist.bounds[0].0, 0.0);
        for pair in hist.bounds.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(hist.bounds.last().unwrap().1, 100.0);
    }

    #[test]
    fn test_degenerate_all_equal_uses_single_bucket() {
        let values = [42.0; 8];
        let hist = histogram::bin_values(&values).unwrap();
        assert_eq!(hist.bounds, vec![(42.0, 42.0)]);
        assert_eq!(hist.counts, vec![8]);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(
            histogram::bin_values(&[]),
            Err(DataError::EmptySeries)
        ));
    }
}

mod comparison_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_dataset() -> Dataset {
        dataset(vec![
            record("Spain", &[(2000, 50.0), (2001, 60.0), (2002, 70.0)]),
            record("France", &[(2000, 55.0), (2002, 75.0)]),
            record("Italy", &[(2001, 40.0)]),
        ])
    }

    fn flat(series: &SeriesValues) -> &Vec<Option<f64>> {
        match series {
            SeriesValues::Flat(values) => values,
            SeriesValues::Points(_) => panic!("expected flat values"),
        }
    }

    #[test]
    fn test_no_comparison_is_single_series() {
        let data = sample_dataset();
        let view =
            comparison::trend_view(&data, "Spain", &ComparisonState::default()).unwrap();

        assert_eq!(view.labels, vec!["2000", "2001", "2002"]);
        assert_eq!(view.datasets.len(), 1);
        assert_eq!(view.datasets[0].label, "Spain");
        assert_eq!(
            flat(&view.datasets[0].values),
            &vec![Some(50.0), Some(60.0), Some(70.0)]
        );
    }

    #[test]
    fn test_by_year_overlay_is_sparse() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByYear);
        state.add_year(2000);
        state.add_year(2002);

        let view = comparison::trend_view(&data, "Spain", &state).unwrap();
        assert_eq!(view.datasets.len(), 3);

        let first = flat(&view.datasets[1].values);
        assert_eq!(first.len(), 3);
        assert_eq!(first, &vec![Some(50.0), None, None]);

        let second = flat(&view.datasets[2].values);
        assert_eq!(second, &vec![None, None, Some(70.0)]);
        assert!(view.datasets[1].emphasis && view.datasets[2].emphasis);
    }

    #[test]
    fn test_by_year_ignores_years_without_data() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByYear);
        state.add_year(1975);

        let view = comparison::trend_view(&data, "Spain", &state).unwrap();
        assert_eq!(view.datasets.len(), 1);
    }

    #[test]
    fn test_by_country_overlays_on_year_union() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByCountry);
        state.add_country("France".to_string());

        let view = comparison::trend_view(&data, "Spain", &state).unwrap();
        assert_eq!(view.labels, vec!["2000", "2001", "2002"]);
        assert_eq!(view.datasets.len(), 2);
        // France has a gap at 2001
        assert_eq!(
            flat(&view.datasets[1].values),
            &vec![Some(55.0), None, Some(75.0)]
        );
    }

    #[test]
    fn test_mode_with_no_targets_degenerates_to_single_series() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByCountry);

        let view = comparison::trend_view(&data, "Spain", &state).unwrap();
        assert_eq!(view.datasets.len(), 1);
        assert_eq!(view.datasets[0].label, "Spain");
    }

    #[test]
    fn test_switching_back_to_none_clears_targets() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByCountry);
        state.add_country("France".to_string());
        state.set_mode(ComparisonMode::None);

        assert!(!state.has_targets());
        let view = comparison::trend_view(&data, "Spain", &state).unwrap();
        assert_eq!(view.datasets.len(), 1);
        assert_eq!(view.datasets[0].label, "Spain");
    }

    #[test]
    fn test_year_view_omits_countries_without_the_year() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByCountry);
        state.add_country("France".to_string());
        state.add_country("Italy".to_string());

        // Italy has no value for 2000
        let view = comparison::year_view(&data, "Spain", 2000, &state).unwrap();
        assert_eq!(view.labels, vec!["Spain", "France"]);
        assert_eq!(view.datasets.len(), 2);
    }

    #[test]
    fn test_scatter_view_pairs_years_and_values() {
        let data = sample_dataset();
        let view = comparison::scatter_view(&data, "France").unwrap();
        match &view.datasets[0].values {
            SeriesValues::Points(points) => {
                assert_eq!(points, &vec![(2000, 55.0), (2002, 75.0)]);
            }
            SeriesValues::Flat(_) => panic!("expected points"),
        }
    }

    #[test]
    fn test_summary_by_year() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByYear);
        state.add_year(2002);

        let summary = comparison::compare_summary(&data, "Spain", 2000, &state).unwrap();
        assert_eq!(summary.value_a, 50.0);
        assert_eq!(summary.value_b, 70.0);
        assert_eq!(summary.difference, 20.0);
        assert_eq!(summary.percent, 40.0);
        assert_eq!(summary.label_a, "Spain (2000)");
        assert_eq!(summary.label_b, "Spain (2002)");
    }

    #[test]
    fn test_summary_by_country() {
        let data = sample_dataset();
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByCountry);
        state.add_country("France".to_string());

        let summary = comparison::compare_summary(&data, "Spain", 2000, &state).unwrap();
        assert_eq!(summary.value_a, 50.0);
        assert_eq!(summary.value_b, 55.0);
        assert_eq!(summary.difference, 5.0);
        assert_eq!(summary.year_b, 2000);
    }

    #[test]
    fn test_summary_missing_pieces_are_validation_errors() {
        let data = sample_dataset();

        // No mode selected
        let err =
            comparison::compare_summary(&data, "Spain", 2000, &ComparisonState::default())
                .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        // Mode selected but no target
        let mut state = ComparisonState::default();
        state.set_mode(ComparisonMode::ByCountry);
        let err = comparison::compare_summary(&data, "Spain", 2000, &state).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        // Target lacks data for the year
        state.add_country("Italy".to_string());
        let err = comparison::compare_summary(&data, "Spain", 2000, &state).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }
}
