// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Prompt construction for scripture generation

use super::generator::GenerationRequest;
use super::model::VersionCode;

/// Render the generation prompt for one request
pub fn generation_prompt(request: &GenerationRequest, congregation: &str) -> String {
    let theme = request.theme.as_str();
    let codes = version_list();

    let mut prompt = format!(
        "You are a biblical assistant for the '{congregation}' church. \
         The theme for this month is \"{theme}\".\n\n\
         Requirements:\n\
         1. The scripture must be clearly relevant to the monthly theme \"{theme}\".\n\
         2. It should offer spiritual insight, encouragement or teaching on that theme.\n\
         3. Provide exactly one bible scripture for day {day} of {month_name} {year}.",
        day = request.day,
        month_name = month_name(request.month),
        year = request.year,
    );

    if !request.excluded_references.is_empty() {
        let used: Vec<&str> = request
            .excluded_references
            .iter()
            .map(String::as_str)
            .collect();
        prompt.push_str(&format!(
            "\n\nThe following scriptures have ALREADY been used this month and must NOT be \
             chosen again. Pick a different passage that still fits \"{theme}\":\n{}",
            used.join(", ")
        ));
    }

    prompt.push_str(&format!(
        "\n\nReturn ONLY a JSON object, with no commentary, containing:\n\
         - \"reference\": the main verse (e.g. \"John 3:16\")\n\
         - \"versions\": an object with the main verse text in {codes}\n\
         - \"expandedReference\": the surrounding range, 2-3 verses before and after \
         (e.g. \"John 3:14-18\")\n\
         - \"expandedVersions\": an object with the expanded passage text in {codes}"
    ));

    prompt
}

fn version_list() -> String {
    VersionCode::ALL
        .iter()
        .map(VersionCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "this month",
    }
}
