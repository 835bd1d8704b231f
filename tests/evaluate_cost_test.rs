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

use common::random_snapshot;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use windowbench::ExactWindowCounter;
use windowbench::StreamSnapshot;
use windowbench::evaluate::EvalConfig;
use windowbench::evaluate::Evaluator;
use windowbench::stair::StairBloomFilter;
use windowbench::stair::StairCountMin;

#[test]
fn test_exact_counter_probes_every_window() {
    let snapshot = StreamSnapshot::from_windows(vec![vec!['a'], vec!['b'], vec!['c'], vec!['d']]);
    let evaluator = Evaluator::new(&snapshot, EvalConfig::new(4)).unwrap();

    let cost = evaluator.frequency_query_cost(&mut ExactWindowCounter::new());
    assert_eq!(cost.values(), &[1.0, 2.0, 3.0, 4.0]);

    let cost = evaluator.membership_query_cost(&mut ExactWindowCounter::new());
    assert_eq!(cost.values(), &[1.0, 2.0, 3.0, 0.0]);
    // the full range holds every item
    assert!(!cost.has_data(4));
}

#[test]
fn test_stair_range_cost_is_bounded_by_levels() {
    let snapshot = StreamSnapshot::from_windows(vec![vec!["hot"]; 16]);
    let evaluator = Evaluator::new(&snapshot, EvalConfig::new(16)).unwrap();
    let cost = evaluator.frequency_query_cost(&mut StairCountMin::with_memory(64 * 1024, 3));

    assert_eq!(cost.get(1), Some(1.0));
    assert_eq!(cost.get(16), Some(4.0));
    for (_, probes) in cost.iter() {
        assert_that!(probes, ge(1.0));
        assert_that!(probes, le(4.0));
    }
}

#[test]
fn test_bloom_membership_cost() {
    let snapshot = random_snapshot(44, 12, 40, 500);
    let evaluator = Evaluator::new(&snapshot, EvalConfig::new(6)).unwrap();
    let mut filter = StairBloomFilter::with_memory(32 * 1024, 3);
    let cost = evaluator.membership_query_cost(&mut filter);

    assert_eq!(cost.len(), 6);
    assert_eq!(cost.get(1), Some(1.0));
    for (bucket, probes) in cost.iter() {
        assert!(cost.has_data(bucket));
        assert_that!(probes, ge(1.0));
        assert_that!(probes, le(bucket as f64));
    }
}
