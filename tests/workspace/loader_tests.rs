use depscope::workspace::model::ReferenceKind;
use depscope::workspace::{CsprojReader, WorkspaceLoader};

use crate::common::{unique_temp_dir, write, write_csproj};

#[test]
fn loader_from_csproj_single_project() {
    let root = unique_temp_dir("depscope_loader_csproj");
    write(&root.join("App/Program.cs"), "class Program { static void Main() {} }");
    let csproj = write_csproj(&root, "App", "net8.0", &[]);

    let ws = WorkspaceLoader::from_path(&csproj).expect("workspace from csproj");
    assert_eq!(ws.projects.len(), 1);
    assert_eq!(ws.projects[0].name, "App");
    assert_eq!(ws.projects[0].target_framework, "net8.0");
    assert_eq!(ws.projects[0].solution_name, "App");
    assert!(
        ws.projects[0]
            .source_files
            .iter()
            .any(|f| f.ends_with("Program.cs"))
    );
}

#[test]
fn loader_follows_transitive_project_references() {
    let root = unique_temp_dir("depscope_loader_sln");
    write_csproj(&root, "A", "net8.0", &["B"]);
    write(&root.join("A/A.cs"), "class A {}");
    write_csproj(&root, "B", "net8.0", &["C"]);
    write(&root.join("B/B.cs"), "class B {}");
    write_csproj(&root, "C", "net8.0", &[]);
    write(&root.join("C/C.cs"), "class C {}");

    // solution lists only A explicitly
    let sln = root.join("All.sln");
    write(
        &sln,
        "Microsoft Visual Studio Solution File, Format Version 12.00\nProject(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"A\", \"A\\A.csproj\", \"{11111111-1111-1111-1111-111111111111}\"\nEndProject\nGlobal\nEndGlobal\n",
    );

    let ws = WorkspaceLoader::from_path(&sln).expect("workspace from sln");
    assert_eq!(ws.solutions, vec!["All"]);
    let names: Vec<&str> = ws.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"A"));
    assert!(names.contains(&"B"));
    assert!(names.contains(&"C"));
    // every project carries the solution that introduced it
    assert!(ws.projects.iter().all(|p| p.solution_name == "All"));
}

#[test]
fn loader_from_dir_prefers_sln() {
    let root = unique_temp_dir("depscope_loader_dir");
    write_csproj(&root, "App", "net8.0", &[]);
    write(&root.join("App/App.cs"), "class App {}");
    // an orphan project not listed in the solution
    write_csproj(&root, "Orphan", "net8.0", &[]);

    let sln = root.join("Main.sln");
    write(
        &sln,
        "Microsoft Visual Studio Solution File, Format Version 12.00\nProject(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App\\App.csproj\", \"{11111111-1111-1111-1111-111111111111}\"\nEndProject\nGlobal\nEndGlobal\n",
    );

    let ws = WorkspaceLoader::from_path(&root).expect("workspace from dir");
    assert_eq!(ws.solutions, vec!["Main"]);
    let names: Vec<&str> = ws.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["App"]);
}

#[test]
fn loader_from_dir_falls_back_to_csproj_scan() {
    let root = unique_temp_dir("depscope_loader_scan");
    write_csproj(&root, "One", "net6.0", &[]);
    write_csproj(&root, "Two", "net6.0", &[]);

    let ws = WorkspaceLoader::from_path(&root).expect("workspace from dir scan");
    let mut names: Vec<&str> = ws.projects.iter().map(|p| p.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["One", "Two"]);
}

#[test]
fn loader_rejects_inputs_without_projects() {
    let root = unique_temp_dir("depscope_loader_empty");
    assert!(WorkspaceLoader::from_path(&root).is_err());
}

#[test]
fn csproj_reference_kinds() {
    let root = unique_temp_dir("depscope_csproj_refs");
    write_csproj(&root, "Lib", "net8.0", &[]);
    let path = root.join("App/App.csproj");
    write(
        &path,
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="../Lib/Lib.csproj" />
    <Reference Include="System.Web, Version=4.0.0.0, Culture=neutral" />
    <PackageReference Include="Newtonsoft.Json" Version="13.0.1" />
  </ItemGroup>
</Project>
"#,
    );

    let project = CsprojReader::read(&path, "Test").expect("read csproj");
    assert_eq!(project.references.len(), 3);
    assert_eq!(project.references[0].kind, ReferenceKind::Project);
    assert_eq!(project.references[0].target_name, "Lib");
    assert!(project.references[0].target_path.is_some());
    assert_eq!(project.references[1].kind, ReferenceKind::Assembly);
    assert_eq!(project.references[1].target_name, "System.Web");
    assert_eq!(project.references[2].kind, ReferenceKind::Assembly);
    assert_eq!(project.references[2].target_name, "Newtonsoft.Json");
}

#[test]
fn tfm_precedence_single_wins() {
    let root = unique_temp_dir("depscope_tfm_single");
    let path = root.join("P/P.csproj");
    write(
        &path,
        "<Project><PropertyGroup><TargetFramework>net6.0</TargetFramework><TargetFrameworks>net48;net6.0</TargetFrameworks></PropertyGroup></Project>",
    );
    let project = CsprojReader::read(&path, "S").unwrap();
    assert_eq!(project.target_framework, "net6.0");
}

#[test]
fn tfm_multi_takes_first_entry() {
    let root = unique_temp_dir("depscope_tfm_multi");
    let path = root.join("P/P.csproj");
    write(
        &path,
        "<Project><PropertyGroup><TargetFrameworks>netstandard2.0;net6.0</TargetFrameworks></PropertyGroup></Project>",
    );
    let project = CsprojReader::read(&path, "S").unwrap();
    assert_eq!(project.target_framework, "netstandard2.0");
}

#[test]
fn tfm_legacy_version_is_converted() {
    let root = unique_temp_dir("depscope_tfm_legacy");
    let path = root.join("P/P.csproj");
    write(
        &path,
        "<Project><PropertyGroup><TargetFrameworkVersion>v4.7.2</TargetFrameworkVersion></PropertyGroup></Project>",
    );
    let project = CsprojReader::read(&path, "S").unwrap();
    assert_eq!(project.target_framework, "net472");
}

#[test]
fn tfm_missing_is_unknown() {
    let root = unique_temp_dir("depscope_tfm_missing");
    let path = root.join("P/P.csproj");
    write(&path, "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>");
    let project = CsprojReader::read(&path, "S").unwrap();
    assert_eq!(project.target_framework, "unknown");
}

#[test]
fn csproj_excludes_bin_and_obj() {
    let root = unique_temp_dir("depscope_csproj_excludes");
    let path = root.join("P/P.csproj");
    write(&path, "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>");
    write(&root.join("P/Code.cs"), "class Code {}");
    write(&root.join("P/bin/Debug/Generated.cs"), "class Generated {}");
    write(&root.join("P/obj/Debug/Temp.cs"), "class Temp {}");

    let project = CsprojReader::read(&path, "S").unwrap();
    assert_eq!(project.source_files.len(), 1);
    assert!(project.source_files[0].ends_with("Code.cs"));
}
