use depscope::workspace::sln::SolutionReader;

use crate::common::{unique_temp_dir, write};

#[test]
fn reads_solution_and_resolves_csproj_paths() {
    let root = unique_temp_dir("depscope_sln");
    let csproj = root.join("src/App/App.csproj");
    write(&csproj, "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>");

    let sln = root.join("MySolution.sln");
    write(
        &sln,
        r#"Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "App", "src\App\App.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Global
EndGlobal
"#,
    );

    let solution = SolutionReader::read(&sln).expect("solution parse");
    assert_eq!(solution.name, "MySolution");
    assert_eq!(solution.projects.len(), 1);
    assert!(solution.warnings.is_empty());
    assert_eq!(solution.projects[0].name, "App");
    assert_eq!(
        solution.projects[0].path,
        csproj.canonicalize().unwrap()
    );
}

#[test]
fn filters_non_csproj_projects() {
    let root = unique_temp_dir("depscope_sln_filter");
    let csproj = root.join("a/a.csproj");
    write(&csproj, "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>");

    let sln = root.join("mix.sln");
    write(
        &sln,
        r#"Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "A", "a\a.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}") = "Native", "c\c.vcxproj", "{22222222-2222-2222-2222-222222222222}"
EndProject
Global
EndGlobal
"#,
    );

    let solution = SolutionReader::read(&sln).expect("solution parse");
    assert_eq!(solution.projects.len(), 1);
    assert_eq!(solution.projects[0].name, "A");
}

#[test]
fn missing_project_paths_become_warnings() {
    let root = unique_temp_dir("depscope_sln_missing");
    let sln = root.join("broken.sln");
    write(
        &sln,
        r#"Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Gone", "gone\gone.csproj", "{33333333-3333-3333-3333-333333333333}"
EndProject
Global
EndGlobal
"#,
    );

    let solution = SolutionReader::read(&sln).expect("solution parse");
    assert!(solution.projects.is_empty());
    assert_eq!(solution.warnings.len(), 1);
    assert!(solution.warnings[0].contains("Gone"));
}
