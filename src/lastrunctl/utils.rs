// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{fs::File, io, path::PathBuf, str::FromStr};

/// An argument that reads from stdin when given as `-`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgOrStdin<T> {
    Stdin,
    Arg(T),
}

impl<T> FromStr for ArgOrStdin<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    type Err = <T as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Self::Stdin)
        } else {
            Ok(Self::Arg(T::from_str(s)?))
        }
    }
}

impl ArgOrStdin<PathBuf> {
    pub fn reader(&self) -> io::Result<Box<dyn io::Read>> {
        Ok(match self {
            ArgOrStdin::Stdin => Box::new(io::stdin()),
            ArgOrStdin::Arg(path) => Box::new(File::open(path)?),
        })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ArgOrStdin::Stdin => None,
            ArgOrStdin::Arg(path) => Some(path),
        }
    }
}
