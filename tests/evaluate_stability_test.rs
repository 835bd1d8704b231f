// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

mod common;

use common::Forgetful;
use common::random_snapshot;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use windowbench::ExactWindowCounter;
use windowbench::WindowSketch;
use windowbench::error::ErrorKind;
use windowbench::evaluate::EvalConfig;
use windowbench::evaluate::Evaluator;
use windowbench::stair::StairBloomFilter;
use windowbench::stair::StairCountMin;

#[test]
fn test_exact_counter_is_stable() {
    let snapshot = random_snapshot(6, 9, 50, 200);
    let evaluator = Evaluator::new(&snapshot, EvalConfig::new(3)).unwrap();

    let fpr = evaluator
        .fpr_stability(&mut ExactWindowCounter::new())
        .unwrap();
    // one bucket per window, not per decision window
    assert_eq!(fpr.scores().len(), 9);
    assert!(fpr.scores().values().iter().all(|&v| v == 0.0));
    assert!(fpr.memory_usage() > 0);

    let are = evaluator
        .are_stability(&mut ExactWindowCounter::new())
        .unwrap();
    assert_eq!(are.into_scores().values(), &[0.0; 9]);
}

#[test]
fn test_stair_sketch_stability() {
    let snapshot = random_snapshot(12, 16, 120, 800);
    let config = EvalConfig::new(8).with_memory_budget(8 * 1024);
    let evaluator = Evaluator::new(&snapshot, config).unwrap();

    let mut filter = StairBloomFilter::with_memory(8 * 1024, 3);
    let fpr = evaluator.fpr_stability(&mut filter).unwrap();
    assert_eq!(fpr.scores().len(), 16);
    for (_, value) in fpr.scores().iter() {
        assert_that!(value, ge(0.0));
        assert_that!(value, le(1.0));
    }
    assert_that!(fpr.memory_usage(), le(8 * 1024));

    let are = evaluator
        .are_stability(&mut StairCountMin::with_memory(8 * 1024, 3))
        .unwrap();
    assert!(are.scores().values().iter().all(|&v| v >= 0.0 && v.is_finite()));
}

#[test]
fn test_stability_stops_at_first_false_negative() {
    let snapshot = random_snapshot(3, 6, 20, 40);
    let evaluator = Evaluator::new(&snapshot, EvalConfig::new(6)).unwrap();
    let err = evaluator
        .are_stability(&mut Forgetful::new(*snapshot.item(0)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FalseNegative);
    assert_eq!(err.context("metric"), Some("are_stability"));
    assert_eq!(err.context("window"), Some("1"));
}

#[test]
fn test_memory_budget_mismatch_does_not_stop_evaluation() {
    let snapshot = random_snapshot(27, 10, 80, 400);
    let unbudgeted = Evaluator::new(&snapshot, EvalConfig::new(4)).unwrap();
    let expected_fpr = unbudgeted
        .fpr(&mut StairBloomFilter::with_memory(8 * 1024, 3))
        .unwrap();
    let expected = unbudgeted
        .fpr_stability(&mut StairBloomFilter::with_memory(8 * 1024, 3))
        .unwrap();
    let memory = expected.memory_usage();

    // a budget far below the sketch, then far above it
    for budget in [64, 1 << 30] {
        assert!(budget < memory || budget > 2 * memory);
        let config = EvalConfig::new(4).with_memory_budget(budget);
        let evaluator = Evaluator::new(&snapshot, config).unwrap();

        let mut filter = StairBloomFilter::with_memory(8 * 1024, 3);
        let stability = evaluator.fpr_stability(&mut filter).unwrap();
        assert_eq!(stability, expected);
        assert_eq!(stability.memory_usage(), WindowSketch::<u64>::memory_usage(&filter));

        let fpr = evaluator
            .fpr(&mut StairBloomFilter::with_memory(8 * 1024, 3))
            .unwrap();
        assert_eq!(fpr, expected_fpr);
    }
}
