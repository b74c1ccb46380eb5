// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

pub mod audit;
pub mod catalog;
pub mod itglue;
pub mod models;
pub mod notify;
pub mod parse;
pub mod report;
