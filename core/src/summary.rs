//! Per-arm aggregation of simulated users.

use crate::{
    error::{AnalysisError, AnalysisResult},
    types::{Group, UserRecord},
};
use serde::{Deserialize, Serialize};

/// Group × converted counts. Row = group index, column 0 = not converted,
/// column 1 = converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub counts: [[u64; 2]; 2],
}

impl ContingencyTable {
    pub fn from_users(users: &[UserRecord]) -> Self {
        let mut counts = [[0u64; 2]; 2];
        for user in users {
            counts[user.group.index()][user.converted as usize] += 1;
        }
        Self { counts }
    }

    pub fn get(&self, group: Group, converted: bool) -> u64 {
        self.counts[group.index()][converted as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Users in `group`.
    pub fn row_total(&self, group: Group) -> u64 {
        self.counts[group.index()].iter().sum()
    }

    /// Users with the given conversion outcome across both arms.
    pub fn col_total(&self, converted: bool) -> u64 {
        self.counts.iter().map(|row| row[converted as usize]).sum()
    }
}

/// Summary statistics for one arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group:           Group,
    pub users:           u64,
    pub conversions:     u64,
    pub conversion_rate: f64,
    /// Mean purchase over converted users only. `None` means no data.
    pub avg_purchase:    Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub control:     GroupSummary,
    pub treatment:   GroupSummary,
    pub contingency: ContingencyTable,
}

impl Summary {
    pub fn group(&self, group: Group) -> &GroupSummary {
        match group {
            Group::Control   => &self.control,
            Group::Treatment => &self.treatment,
        }
    }
}

/// Share of `group` that converted. Fails with `DivisionByZero` on an empty group.
pub fn conversion_rate(users: &[UserRecord], group: Group) -> AnalysisResult<f64> {
    let (members, converted) = users
        .iter()
        .filter(|u| u.group == group)
        .fold((0u64, 0u64), |(n, c), u| (n + 1, c + u.converted as u64));

    if members == 0 {
        return Err(AnalysisError::DivisionByZero {
            what: format!("conversion rate of empty {group} group"),
        });
    }
    Ok(converted as f64 / members as f64)
}

/// Purchase amounts of converted users in `group`, in user order.
pub fn converted_purchases(users: &[UserRecord], group: Group) -> Vec<f64> {
    users
        .iter()
        .filter(|u| u.group == group && u.converted)
        .map(|u| u.purchase_amount)
        .collect()
}

/// Mean purchase among converted users of `group`; `None` if nobody converted.
/// Non-converted users' zero amounts never enter the mean.
pub fn average_purchase(users: &[UserRecord], group: Group) -> Option<f64> {
    let purchases = converted_purchases(users, group);
    if purchases.is_empty() {
        return None;
    }
    Some(purchases.iter().sum::<f64>() / purchases.len() as f64)
}

pub fn summarize(users: &[UserRecord]) -> AnalysisResult<Summary> {
    let contingency = ContingencyTable::from_users(users);

    let summarize_group = |group: Group| -> AnalysisResult<GroupSummary> {
        Ok(GroupSummary {
            group,
            users: contingency.row_total(group),
            conversions: contingency.get(group, true),
            conversion_rate: conversion_rate(users, group)?,
            avg_purchase: average_purchase(users, group),
        })
    };

    Ok(Summary {
        control: summarize_group(Group::Control)?,
        treatment: summarize_group(Group::Treatment)?,
        contingency,
    })
}
