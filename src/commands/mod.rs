// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod ipos;
pub mod stats;
pub mod subscription;
pub mod allotment;
pub mod importer;
pub mod exporter;
pub mod settings;
pub mod sample;
pub mod doctor;
